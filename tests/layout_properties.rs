//! Property tests for buffer layout resolution.

use std::collections::HashSet;

use proptest::prelude::*;
use zenstride::{
    BaseType, BufferDescriptor, LayoutErrorKind, PixelGeometry, Unstoppable, resolve,
    row_major_strides,
};

/// The ways callers lay out pixel and channel axes.
#[derive(Clone, Copy, Debug)]
enum Convention {
    VolumeZyxc,
    VolumeZyMerged,
    RectYxc,
    RectPixelsByChannel,
    RectRowsMerged,
    RectFlat,
    SpanXc,
    SpanFlat,
}

impl Convention {
    fn geometry(self, w: u32, h: u32, d: u32, c: u32) -> PixelGeometry {
        match self {
            Self::VolumeZyxc | Self::VolumeZyMerged => PixelGeometry::volume(w, h, d, c),
            Self::RectYxc | Self::RectPixelsByChannel | Self::RectRowsMerged | Self::RectFlat => {
                PixelGeometry::rect(w, h, c)
            }
            Self::SpanXc | Self::SpanFlat => PixelGeometry::span(w, c),
        }
    }

    fn shape(self, g: &PixelGeometry) -> Vec<usize> {
        let (w, h, d, c) = (
            g.width as usize,
            g.height as usize,
            g.depth as usize,
            g.channels as usize,
        );
        match self {
            Self::VolumeZyxc => vec![d, h, w, c],
            Self::VolumeZyMerged => vec![d, h, w * c],
            Self::RectYxc => vec![h, w, c],
            Self::RectPixelsByChannel => vec![h * w, c],
            Self::RectRowsMerged => vec![h, w * c],
            Self::RectFlat => vec![h * w * c],
            Self::SpanXc => vec![w, c],
            Self::SpanFlat => vec![w * c],
        }
    }
}

fn convention() -> impl Strategy<Value = Convention> {
    prop_oneof![
        Just(Convention::VolumeZyxc),
        Just(Convention::VolumeZyMerged),
        Just(Convention::RectYxc),
        Just(Convention::RectPixelsByChannel),
        Just(Convention::RectRowsMerged),
        Just(Convention::RectFlat),
        Just(Convention::SpanXc),
        Just(Convention::SpanFlat),
    ]
}

fn format_code() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['b', 'B', 'h', 'H', 'i', 'I', 'l', 'L', 'f', 'd', 'e'])
}

proptest! {
    #[test]
    fn recognized_conventions_visit_every_element_once(
        conv in convention(),
        code in format_code(),
        w in 1u32..6,
        h in 1u32..5,
        d in 1u32..4,
        c in 1u32..5,
    ) {
        let geometry = conv.geometry(w, h, d, c);
        let shape = conv.shape(&geometry);
        let elem = BaseType::from_code(code).size();
        let strides = row_major_strides(&shape, elem);
        let data = vec![0u8; shape.iter().product::<usize>() * elem];
        let buf = BufferDescriptor::new(Some(code), elem, &shape, &strides, &data);

        let layout = resolve(&buf, geometry).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(layout.format(), BaseType::from_code(code));
        prop_assert_eq!(layout.byte_size(), data.len());

        let mut offsets = HashSet::new();
        for z in 0..geometry.depth {
            for y in 0..geometry.height {
                for x in 0..geometry.width {
                    for ch in 0..geometry.channels {
                        let off = layout.offset(x, y, z, ch).expect("index in range");
                        prop_assert_eq!(off % elem, 0);
                        prop_assert!(offsets.insert(off), "offset {} visited twice", off);
                    }
                }
            }
        }
        let count = geometry.element_count().unwrap();
        prop_assert_eq!(offsets.len(), count);
        prop_assert_eq!(offsets.iter().max().copied().unwrap() + elem, data.len());

        let mut visited = 0usize;
        layout.visit_elements(Unstoppable, |_, bytes| {
            assert_eq!(bytes.len(), elem);
            visited += 1;
        }).unwrap();
        prop_assert_eq!(visited, count);
    }

    #[test]
    fn wrong_itemsize_is_size_mismatch(
        conv in convention(),
        code in format_code(),
        w in 1u32..5,
        h in 1u32..4,
        c in 1u32..4,
        bump in 1usize..8,
    ) {
        let geometry = conv.geometry(w, h, 2, c);
        let shape = conv.shape(&geometry);
        let elem = BaseType::from_code(code).size();
        let strides = row_major_strides(&shape, elem);
        let data = vec![0u8; shape.iter().product::<usize>() * elem];
        let buf = BufferDescriptor::new(Some(code), elem, &shape, &strides, &data)
            .with_itemsize(elem + bump);
        let err = resolve(&buf, geometry).unwrap_err();
        prop_assert_eq!(err.kind(), LayoutErrorKind::SizeMismatch);
    }

    #[test]
    fn wrong_element_count_is_size_mismatch(
        conv in convention(),
        w in 1u32..5,
        h in 1u32..4,
        c in 1u32..4,
        extra in 1usize..10,
        shrink in any::<bool>(),
    ) {
        let geometry = conv.geometry(w, h, 2, c);
        let shape = conv.shape(&geometry);
        let strides = row_major_strides(&shape, 4);
        let data = vec![0u8; shape.iter().product::<usize>() * 4];
        let count = geometry.element_count().unwrap();
        let declared = if shrink { count.saturating_sub(extra) } else { count + extra };
        prop_assume!(declared != count);
        let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data).with_len(declared);
        let err = resolve(&buf, geometry).unwrap_err();
        prop_assert_eq!(err.kind(), LayoutErrorKind::SizeMismatch);
    }

    #[test]
    fn split_and_merged_channel_axes_address_the_same_bytes(
        w in 1u32..8,
        h in 1u32..6,
        c in 1u32..5,
    ) {
        let geometry = PixelGeometry::rect(w, h, c);
        let (wu, hu, cu) = (w as usize, h as usize, c as usize);
        let data = vec![0u8; wu * hu * cu * 4];

        let split_shape = [hu, wu, cu];
        let split_strides = row_major_strides(&split_shape, 4);
        let split = BufferDescriptor::new(Some('f'), 4, &split_shape, &split_strides, &data);
        let a = resolve(&split, geometry).unwrap();

        let merged_shape = [hu, wu * cu];
        let merged_strides = row_major_strides(&merged_shape, 4);
        let merged = BufferDescriptor::new(Some('f'), 4, &merged_shape, &merged_strides, &data);
        let b = resolve(&merged, geometry).unwrap();

        for y in 0..h {
            for x in 0..w {
                for ch in 0..c {
                    prop_assert_eq!(a.offset(x, y, 0, ch), b.offset(x, y, 0, ch));
                }
            }
        }
    }

    #[test]
    fn loose_channel_axis_is_noncontiguous(
        w in 1u32..6,
        h in 1u32..5,
        c in 2u32..5,
        spread in 2isize..4,
    ) {
        let (wu, hu, cu) = (w as usize, h as usize, c as usize);
        let elem = 4isize;
        let inner = elem * spread;
        let shape = [hu, wu, cu];
        let strides = [inner * (wu * cu) as isize, inner * cu as isize, inner];
        let data = vec![0u8; wu * hu * cu * inner as usize];
        let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data);
        let err = resolve(&buf, PixelGeometry::rect(w, h, c)).unwrap_err();
        prop_assert_eq!(err.kind(), LayoutErrorKind::NoncontiguousChannels);
    }
}
