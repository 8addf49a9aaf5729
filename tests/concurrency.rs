//! Resolution and the shared store under parallel use.

use rayon::prelude::*;
use zenstride::{
    Attributes, BufferDescriptor, MemoryStore, PixelGeometry, StoreConfig, TypeDesc, Value,
    get_typed, resolve, row_major_strides,
};

#[test]
fn parallel_resolution_over_one_buffer() {
    let shape = [16, 32, 4];
    let strides = row_major_strides(&shape, 2);
    let data = vec![0u8; 16 * 32 * 4 * 2];

    let strides_seen: Vec<(isize, isize)> = (0..256)
        .into_par_iter()
        .map(|_| {
            let buf = BufferDescriptor::new(Some('e'), 2, &shape, &strides, &data);
            let layout = resolve(&buf, PixelGeometry::rect(32, 16, 4)).unwrap();
            (layout.x_stride(), layout.y_stride())
        })
        .collect();
    assert!(strides_seen.iter().all(|&s| s == (8, 256)));
}

#[test]
fn parallel_writers_share_one_store() {
    let store = MemoryStore::init(StoreConfig::new());
    (0..64).into_par_iter().for_each(|i| {
        let attrs = Attributes::new(&store);
        attrs
            .attribute_typed(&format!("n{i}"), TypeDesc::INT.array(2), &vec![i, -i].into())
            .unwrap();
        attrs.attribute_str("shared", "same text").unwrap();
    });
    for i in 0..64 {
        assert_eq!(
            get_typed(&store, &format!("n{i}"), TypeDesc::INT.array(2)),
            Some(Value::from(vec![i, -i]))
        );
    }
    let stats = store.shutdown();
    // 64 arrays + "shared" + "version"
    assert_eq!(stats.attributes, 66);
    assert_eq!(stats.interned, 2);
}
