// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

mod address;
mod amount;
mod hash;
mod tier;

pub use crate::primitives::address::*;
pub use crate::primitives::amount::*;
pub use crate::primitives::hash::*;
pub use crate::primitives::tier::*;
