// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

pub mod fasta;
pub mod normalize;
pub mod preview;
pub mod record;
