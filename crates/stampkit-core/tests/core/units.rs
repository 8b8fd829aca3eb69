use proptest::prelude::*;
use stampkit_core::{UnitConverter, PX_PER_MM, WORK_AREA_LEFT, WORK_AREA_TOP};

#[test]
fn test_work_area_origin_accounts_for_chrome() {
    assert_eq!(WORK_AREA_LEFT, 64.0);
    assert_eq!(WORK_AREA_TOP, 64.0);
}

#[test]
fn test_custom_density() {
    let units = UnitConverter::with_px_per_mm(10.0);
    assert_eq!(units.mm_to_px(2.5), 25.0);
    assert_eq!(units.px_to_mm(25.0), 2.5);
    assert_eq!(UnitConverter::default().px_per_mm(), PX_PER_MM);
}

proptest! {
    #[test]
    fn mm_px_round_trip(mm in 0.0f64..500.0) {
        let units = UnitConverter::STANDARD;
        let back = units.px_to_mm(units.mm_to_px(mm));
        prop_assert!((back - mm).abs() < 1e-9);
    }

    #[test]
    fn pt_px_round_trip_within_rounding(pt in 4.0f64..72.0) {
        let units = UnitConverter::STANDARD;
        let back = units.px_to_pt(units.pt_to_px(pt));
        prop_assert!((back - pt).abs() <= 0.06);
    }
}
