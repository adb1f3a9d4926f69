// Copyright (c) Sienna Satterwhite, ordcore Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrdError {
    #[error("container is empty")]
    EmptyContainer,
    #[error("coin probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
    #[error("maximum height must be non-zero")]
    InvalidMaxHeight,
}

pub type Result<T> = std::result::Result<T, OrdError>;
