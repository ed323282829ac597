//! Content access across complex layouts: direct reads, cached
//! conversions, invalidation and concurrent readers.

use std::thread;

use numerus_core::{
    ComplexLayout, ContentError, ElementKind, MemoryOrder, Shape, ShapeSpec, TypeTag, DIM_ANY,
};
use numerus_data::{DataError, DataObject, NumericData, SpikesData, StateSet};
use numerus_dataml::CodecContext;
use numerus_test_utils::{bytes_of, values_of, ComplexExample};
use proptest::prelude::*;

fn example(layout: ComplexLayout) -> NumericData {
    let ex = ComplexExample::new();
    let mut d = NumericData::with_structure(
        TypeTag::complex(ElementKind::Float64).with_layout(layout),
        ex.shape(),
    )
    .unwrap();
    match layout {
        ComplexLayout::Adjacent => d
            .set_content(&ex.real_bytes(), Some(&ex.imag_bytes()))
            .unwrap(),
        ComplexLayout::Interleaved => d.set_content(&ex.interleaved_bytes(), None).unwrap(),
    }
    d
}

fn request(layout: ComplexLayout) -> TypeTag {
    TypeTag::layout_request(layout)
}

#[test]
fn adjacent_object_served_interleaved() {
    let ex = ComplexExample::new();
    let d = example(ComplexLayout::Adjacent);

    let view = d.content(&request(ComplexLayout::Interleaved)).unwrap();
    assert!(view.converted);
    assert_eq!(view.imag, None);
    assert_eq!(
        values_of::<f64>(view.real),
        [0.0, 6.0, 1.0, 7.0, 2.0, 8.0, 3.0, 9.0, 4.0, 10.0, 5.0, 11.0]
    );
    assert_eq!(view.real, ex.interleaved_bytes().as_slice());
    assert_eq!(d.conversions(), 1);

    let direct = d.content(&request(ComplexLayout::Adjacent)).unwrap();
    assert!(!direct.converted);
    assert_eq!(direct.real, ex.real_bytes().as_slice());
    assert_eq!(direct.imag, Some(ex.imag_bytes().as_slice()));
    assert_eq!(d.conversions(), 1);
}

#[test]
fn new_content_invalidates_conversion() {
    let d0 = example(ComplexLayout::Adjacent);
    let mut d = d0.clone();
    d.content(&request(ComplexLayout::Interleaved)).unwrap();

    let re = bytes_of(&[10.0f64, 11.0, 12.0, 13.0, 14.0, 15.0]);
    let im = bytes_of(&[-1.0f64; 6]);
    d.set_content(&re, Some(&im)).unwrap();
    let view = d.content(&request(ComplexLayout::Interleaved)).unwrap();
    assert_eq!(
        values_of::<f64>(view.real)[..4],
        [10.0, -1.0, 11.0, -1.0]
    );
    assert_eq!(d.conversions(), 2);
    assert_eq!(d0.conversions(), 0);
}

#[test]
fn write_access_then_read_sees_write() {
    let mut d = example(ComplexLayout::Interleaved);
    d.content(&request(ComplexLayout::Adjacent)).unwrap();

    let block = d
        .content_for_write(&request(ComplexLayout::Interleaved))
        .unwrap()
        .real;
    block[8..16].copy_from_slice(&42.0f64.to_ne_bytes());

    let (re, im) = d.values::<f64>().unwrap();
    assert_eq!(re[0], 0.0);
    assert_eq!(im.unwrap()[0], 42.0);
    assert!(matches!(
        d.content_for_write(&request(ComplexLayout::Adjacent)),
        Err(ContentError::ConvertedWrite)
    ));
}

#[test]
fn row_major_rejected_everywhere() {
    let mut d = example(ComplexLayout::Adjacent);
    let row = TypeTag::unspecified().with_order(MemoryOrder::RowMajor);
    assert_eq!(d.content(&row).err(), Some(ContentError::RowMajorRequest));
    assert!(d.content_for_write(&row).is_err());
    assert!(d
        .set_structure(
            TypeTag::real(ElementKind::Float64).with_order(MemoryOrder::RowMajor),
            Shape::from([2])
        )
        .is_err());
}

#[test]
fn concurrent_readers_share_one_conversion() {
    let ex = ComplexExample::new();
    let d = example(ComplexLayout::Adjacent);
    let expected = ex.interleaved_bytes();

    thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    d.content(&request(ComplexLayout::Interleaved))
                        .unwrap()
                        .real
                        .to_vec()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
    assert_eq!(d.conversions(), 1);
}

#[test]
fn validation_is_repeatable() {
    let d = example(ComplexLayout::Interleaved);
    let wanted = TypeTag::complex(ElementKind::Float64);
    let shape = ShapeSpec::from_raw(&[DIM_ANY, 3]).unwrap();
    for _ in 0..3 {
        d.validate_structure("input", &wanted, &shape).unwrap();
    }
    let wrong = ShapeSpec::from_raw(&[3, DIM_ANY]).unwrap();
    let first = d.validate_structure("input", &wanted, &wrong).unwrap_err();
    let second = d.validate_structure("input", &wanted, &wrong).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(d.structure().shape(), &Shape::from([2, 3]));
}

#[test]
fn transport_round_trip_between_objects() {
    let mut src = example(ComplexLayout::Adjacent);
    src.init_complete(16);
    let stream = src.transport_stream().to_vec();
    assert_eq!(stream.len(), 16 + 96);

    let mut dst = NumericData::with_structure(
        TypeTag::complex(ElementKind::Float64).with_layout(ComplexLayout::Adjacent),
        Shape::from([2, 3]),
    )
    .unwrap();
    dst.set_transport_content(&stream[16..]).unwrap();
    assert_eq!(dst.values::<f64>().unwrap(), src.values::<f64>().unwrap());
    assert!(matches!(
        dst.set_transport_content(&stream[15..]),
        Err(DataError::Content(ContentError::StreamLength { .. }))
    ));
}

#[test]
fn spike_capacity_violation_copies_nothing() {
    let ctx = CodecContext::new();
    let mut s = SpikesData::with_dims(Shape::from([2, 2])).unwrap();
    s.set_content(&[3, 1]).unwrap();
    let err = s
        .set_transport_content(&bytes_of(&[0i32, 1, 2, 3, 0]))
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::Content(ContentError::CapacityExceeded { count: 5, capacity: 4 })
    ));
    assert_eq!(s.spikes(), [3, 1]);

    let node = s.state_get(Default::default()).unwrap();
    let mut copy = SpikesData::new();
    copy.state_set(StateSet::Node(&node), &ctx).unwrap();
    assert_eq!(copy.spikes(), [3, 1]);
}

#[test]
fn objects_behind_the_trait() {
    let objects: Vec<Box<dyn DataObject>> = vec![
        Box::new(example(ComplexLayout::Adjacent)),
        Box::new(SpikesData::with_dims(Shape::from([5])).unwrap()),
    ];
    let names: Vec<_> = objects.iter().map(|o| o.class_name()).collect();
    assert_eq!(names, ["std/2009/data/numeric", "std/2009/data/spikes"]);

    let open = TypeTag::unspecified();
    let copies: Vec<_> = objects.iter().map(|o| o.duplicate()).collect();
    for (a, b) in objects.iter().zip(&copies) {
        assert_eq!(a.generic_structure(&open), b.generic_structure(&open));
        assert_eq!(a.transport_stream(), b.transport_stream());
    }
}

proptest! {
    #[test]
    fn layouts_are_mutual_inverses(
        pairs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..40),
    ) {
        let re: Vec<i32> = pairs.iter().map(|p| p.0).collect();
        let im: Vec<i32> = pairs.iter().map(|p| p.1).collect();
        let shape = Shape::from([re.len() as u64]);
        let mut adj = NumericData::with_structure(
            TypeTag::complex(ElementKind::Int32).with_layout(ComplexLayout::Adjacent),
            shape.clone(),
        ).unwrap();
        adj.set_values(&re, Some(&im)).unwrap();

        let inter_bytes = adj.content(&request(ComplexLayout::Interleaved)).unwrap().real.to_vec();
        let mut inter = NumericData::with_structure(
            TypeTag::complex(ElementKind::Int32).with_layout(ComplexLayout::Interleaved),
            shape,
        ).unwrap();
        inter.set_content(&inter_bytes, None).unwrap();

        let back = inter.content(&request(ComplexLayout::Adjacent)).unwrap();
        prop_assert_eq!(values_of::<i32>(back.real), re);
        prop_assert_eq!(values_of::<i32>(back.imag.unwrap()), im);
    }

    #[test]
    fn real_content_is_never_converted(
        values in prop::collection::vec(any::<f32>(), 1..30),
        interleaved in any::<bool>(),
    ) {
        let mut d = NumericData::with_structure(
            TypeTag::real(ElementKind::Float32),
            Shape::from([values.len() as u64]),
        ).unwrap();
        d.set_values(&values, None).unwrap();
        let layout = if interleaved { ComplexLayout::Interleaved } else { ComplexLayout::Adjacent };
        let expect = bytes_of(&values);
        let view = d.content(&request(layout)).unwrap();
        prop_assert!(!view.converted);
        prop_assert_eq!(view.real, expect.as_slice());
        prop_assert_eq!(d.conversions(), 0);
    }
}
