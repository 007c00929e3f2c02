//! Three-layer terrain height value.

/// Immutable `(base, underground, main)` height triple.
///
/// Construction clamps upward so `base ≤ underground ≤ main` always holds:
/// `underground` is raised to `base`, then `main` to `underground`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heights {
    base: f32,
    underground: f32,
    main: f32,
}

impl Heights {
    /// Builds a triple, raising out-of-order layers to restore the ordering.
    pub fn new(main: f32, underground: f32, base: f32) -> Self {
        let underground = underground.max(base);
        let main = main.max(underground);
        Self {
            base,
            underground,
            main,
        }
    }

    /// All three layers at `height`.
    pub fn flat(height: f32) -> Self {
        Self::new(height, height, height)
    }

    /// Bedrock layer.
    pub fn base(&self) -> f32 {
        self.base
    }

    /// Diggable layer top.
    pub fn underground(&self) -> f32 {
        self.underground
    }

    /// Visible surface.
    pub fn main(&self) -> f32 {
        self.main
    }

    /// Lowers the surface by `depth`, never below `base`.
    ///
    /// The underground layer follows the surface down when it would end up
    /// above it.
    pub fn dig(self, depth: f32) -> Self {
        let main = (self.main - depth.max(0.0)).max(self.base);
        Self::new(main, self.underground.min(main), self.base)
    }

    /// Raises the surface by `height`.
    pub fn build(self, height: f32) -> Self {
        Self::new(self.main + height.max(0.0), self.underground, self.base)
    }

    /// Shifts all three layers by `offset`.
    pub fn translate(self, offset: f32) -> Self {
        Self::new(
            self.main + offset,
            self.underground + offset,
            self.base + offset,
        )
    }

    /// Weighted average of `(heights, weight)` samples, or `None` when the
    /// weights sum to zero. A convex blend keeps the layer ordering.
    pub fn blend<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Heights, f32)>,
    {
        let (mut main, mut underground, mut base, mut total) = (0.0, 0.0, 0.0, 0.0);
        for (h, w) in samples {
            main += h.main * w;
            underground += h.underground * w;
            base += h.base * w;
            total += w;
        }
        (total > 0.0).then(|| Self::new(main / total, underground / total, base / total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ordered(h: Heights) {
        assert!(h.base() <= h.underground() && h.underground() <= h.main(), "{h:?}");
    }

    #[test]
    fn main_is_raised_to_underground() {
        let h = Heights::new(0.0, 10.0, 5.0);
        assert_eq!((h.base(), h.underground(), h.main()), (5.0, 10.0, 10.0));
    }

    #[test]
    fn underground_is_raised_to_base() {
        let h = Heights::new(3.0, 1.0, 2.0);
        assert_eq!((h.base(), h.underground(), h.main()), (2.0, 2.0, 3.0));
    }

    #[test]
    fn every_argument_order_is_ordered() {
        let vals = [-4.0, 0.0, 7.5];
        for &a in &vals {
            for &b in &vals {
                for &c in &vals {
                    assert_ordered(Heights::new(a, b, c));
                }
            }
        }
    }

    #[test]
    fn dig_lowers_main_and_drags_underground() {
        let h = Heights::new(10.0, 8.0, 0.0).dig(5.0);
        assert_eq!(h.main(), 5.0);
        assert_eq!(h.underground(), 5.0);
        assert_eq!(h.base(), 0.0);
    }

    #[test]
    fn dig_stops_at_base() {
        let h = Heights::new(10.0, 8.0, 2.0).dig(100.0);
        assert_eq!(h.main(), 2.0);
        assert_ordered(h);
    }

    #[test]
    fn build_raises_only_main() {
        let h = Heights::new(4.0, 3.0, 1.0).build(2.5);
        assert_eq!((h.base(), h.underground(), h.main()), (1.0, 3.0, 6.5));
    }

    #[test]
    fn translate_shifts_all_layers() {
        let h = Heights::new(4.0, 3.0, 1.0).translate(-2.0);
        assert_eq!((h.base(), h.underground(), h.main()), (-1.0, 1.0, 2.0));
    }

    #[test]
    fn blend_preserves_ordering() {
        let a = Heights::new(10.0, 2.0, 0.0);
        let b = Heights::new(4.0, 4.0, 3.0);
        let h = Heights::blend([(a, 0.25), (b, 0.75)]).unwrap();
        assert_ordered(h);
        assert!((h.main() - 5.5).abs() < 1e-5);
    }

    #[test]
    fn blend_of_nothing_is_none() {
        assert!(Heights::blend(Vec::<(Heights, f32)>::new()).is_none());
        assert!(Heights::blend([(Heights::flat(1.0), 0.0)]).is_none());
    }
}
