//! End-to-end scenarios for layout resolution and attribute round trips.

use zenstride::{
    Aggregate, AttributeError, Attributes, BaseType, BufferDescriptor, LayoutError,
    LayoutErrorKind, MemoryStore, PixelGeometry, StoreConfig, TypeDesc, Value, get_typed,
    resolve, resolve_pixeldims, row_major_strides, set_typed,
};

fn float_rgb_4x2() -> Vec<u8> {
    (0..(4 * 2 * 3 * 4)).map(|i| i as u8).collect()
}

#[test]
fn rect_hwc_float32() {
    let data = float_rgb_4x2();
    let shape = [2, 4, 3];
    let strides = row_major_strides(&shape, 4);
    let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data);
    let layout = resolve_pixeldims(&buf, 3, 4, 2, 1, 2).unwrap();
    assert_eq!(layout.format(), BaseType::Float);
    assert_eq!(layout.x_stride(), 12);
    assert_eq!(layout.y_stride(), 48);
    assert_eq!(layout.data().as_ptr(), data.as_ptr());
    assert_eq!(layout.byte_size(), 96);
}

#[test]
fn rect_merged_pixels_matches_hwc() {
    let data = float_rgb_4x2();
    let hwc_shape = [2, 4, 3];
    let hwc_strides = row_major_strides(&hwc_shape, 4);
    let hwc = BufferDescriptor::new(Some('f'), 4, &hwc_shape, &hwc_strides, &data);
    let a = resolve(&hwc, PixelGeometry::rect(4, 2, 3)).unwrap();

    let merged_shape = [8, 3];
    let merged_strides = row_major_strides(&merged_shape, 4);
    let merged = BufferDescriptor::new(Some('f'), 4, &merged_shape, &merged_strides, &data);
    let b = resolve(&merged, PixelGeometry::rect(4, 2, 3)).unwrap();

    for y in 0..2 {
        for x in 0..4 {
            for c in 0..3 {
                assert_eq!(a.offset(x, y, 0, c), b.offset(x, y, 0, c), "({y},{x},{c})");
                assert_eq!(a.element(x, y, 0, c), b.element(x, y, 0, c));
            }
        }
    }
}

#[test]
fn noncontiguous_channels_scenario() {
    let shape = [2, 4, 3];
    let strides = [4 * 3 * 8, 3 * 8, 8];
    let data = vec![0u8; 2 * 4 * 3 * 8];
    let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data);
    let err = resolve(&buf, PixelGeometry::rect(4, 2, 3)).unwrap_err();
    assert_eq!(err.kind(), LayoutErrorKind::NoncontiguousChannels);
    assert!(err.to_string().contains("noncontiguous channels"));
}

#[test]
fn ambiguous_shape_message_helps_the_caller() {
    let shape = [2, 2, 2, 3];
    let strides = row_major_strides(&shape, 4);
    let data = vec![0u8; 24 * 4];
    let buf = BufferDescriptor::new(Some('f'), 4, &shape, &strides, &data);
    let err = resolve(&buf, PixelGeometry::rect(4, 2, 3)).unwrap_err();
    match &err {
        LayoutError::ShapeAmbiguous {
            pixeldims, ndim, ..
        } => {
            assert_eq!(*pixeldims, 2);
            assert_eq!(*ndim, 4);
        }
        other => panic!("unexpected error {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("[height, width, channels]"), "{msg}");
}

#[test]
fn attribute_round_trips() {
    let store = MemoryStore::init(StoreConfig::new());
    let cases = [
        (TypeDesc::INT, Value::Int(42)),
        (
            TypeDesc::with_aggregate(BaseType::Int32, Aggregate::Vec3),
            Value::from(vec![1, -2, 3]),
        ),
        (TypeDesc::FLOAT, Value::Float(0.25)),
        (TypeDesc::STRING.array(2), Value::from(vec!["aces", "srgb"])),
    ];
    for (i, (ty, value)) in cases.iter().enumerate() {
        let name = format!("attr{i}");
        set_typed(&store, &name, *ty, value).unwrap();
        assert_eq!(get_typed(&store, &name, *ty).as_ref(), Some(value), "{ty}");
    }
}

#[test]
fn failed_set_creates_nothing() {
    let store = MemoryStore::init(StoreConfig::new());
    let ty = TypeDesc::with_aggregate(BaseType::Int32, Aggregate::Vec3);
    let err = set_typed(&store, "tile", ty, &Value::from(vec![1, 2])).unwrap_err();
    assert_eq!(
        err,
        AttributeError::CountMismatch {
            ty,
            expected: 3,
            actual: 2
        }
    );
    assert_eq!(get_typed(&store, "tile", ty), None);
}

#[test]
fn facade_over_shared_store() {
    let store = MemoryStore::init(StoreConfig::new().with_max_attributes(8));
    {
        let attrs = Attributes::new(&store);
        attrs.attribute_str("colorspace", "linear").unwrap();
        attrs.attribute_int("threads", 0).unwrap();
    }
    let reader = Attributes::new(&store);
    assert_eq!(reader.get_string_attribute("colorspace", ""), "linear");
    assert_eq!(reader.get_int_attribute("threads", 9), 0);
    let stats = store.shutdown();
    assert_eq!(stats.attributes, 3);
}
