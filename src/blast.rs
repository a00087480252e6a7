// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

pub mod export;
pub mod filter;
pub mod hit;
pub mod index;
pub mod parse;
pub mod result;
pub mod search;
pub mod tools;
