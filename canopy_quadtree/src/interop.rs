// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kurbo interop for `f64` trees.

use kurbo::Rect;

use crate::types::Bounds;

impl From<Rect> for Bounds<f64> {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1 - rect.x0, rect.y1 - rect.y0)
    }
}

impl From<Bounds<f64>> for Rect {
    fn from(bounds: Bounds<f64>) -> Self {
        Self::new(
            bounds.left,
            bounds.top,
            bounds.left + bounds.width,
            bounds.top + bounds.height,
        )
    }
}
