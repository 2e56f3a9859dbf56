// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

/// Largest supported resolution: the root side `2^30` still fits the `i32` grid.
pub const MAX_RESOLUTION: u32 = 30;

/// Errors raised while creating or growing a tree.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum QuadtreeError {
    /// The root side `2^resolution` would not fit the `i32` coordinate range.
    #[error("resolution {resolution} is too high (maximum is {max})")]
    ResolutionTooLarge {
        /// Requested resolution.
        resolution: u32,
        /// Largest accepted resolution.
        max: u32,
    },
}

/// Validate a resolution and return the root side length.
pub(crate) fn side_for(resolution: u32) -> Result<i32, QuadtreeError> {
    if resolution > MAX_RESOLUTION {
        return Err(QuadtreeError::ResolutionTooLarge {
            resolution,
            max: MAX_RESOLUTION,
        });
    }
    Ok(1_i32 << resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_boundaries() {
        assert_eq!(side_for(0), Ok(1));
        assert_eq!(side_for(3), Ok(8));
        assert_eq!(side_for(MAX_RESOLUTION), Ok(1 << 30));
        assert_eq!(
            side_for(31),
            Err(QuadtreeError::ResolutionTooLarge {
                resolution: 31,
                max: 30
            })
        );
    }
}
