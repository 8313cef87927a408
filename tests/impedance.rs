use stave_thermal::impedance::{
    combine_parallel, thermal_impedances, CoolantParams, HeatCorrection, ImpedanceError,
    ImpedanceModel, LiquidProfile,
};
use stave_thermal::layout::FEA_PROFILE;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn reproduces_closed_form_fixture() {
    init_logger();
    let profile = [100.0, 80.0, 60.0, 40.0, 20.0, 0.0];
    let c_liquid = 100.0;
    let flow_per_min = 60.0;
    let temps = [30.0; 5];

    let got = thermal_impedances(&temps, &profile, c_liquid, flow_per_min).unwrap();

    let flow_per_sec = 1.0;
    let expected: Vec<f64> = (0..5)
        .map(|i| {
            let heat = (profile[i + 1] - profile[i]).abs() * c_liquid * 0.5 * flow_per_sec;
            ((profile[i] + profile[i + 1]) / 2.0 - temps[i]).abs() / heat
        })
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn mismatched_lengths_are_rejected() {
    init_logger();
    let err = thermal_impedances(&[30.0; 5], &[1.0, 2.0, 3.0], 100.0, 60.0).unwrap_err();
    assert_eq!(
        err,
        ImpedanceError::ProfileLengthMismatch {
            regions: 5,
            profile: 3
        }
    );

    let model = ImpedanceModel::new(CoolantParams {
        temp_in: -30.0,
        temp_out: -25.0,
        c_liquid: 2000.0,
        flow_rate: 1.5,
    });
    let profile = LiquidProfile::new(FEA_PROFILE.to_vec()).unwrap();
    assert!(matches!(
        model.impedances(&[-20.0; 27], &profile, None),
        Err(ImpedanceError::ProfileLengthMismatch { .. })
    ));
}

#[test]
fn fea_profile_spans_inlet_to_outlet() {
    init_logger();
    let model = ImpedanceModel::new(CoolantParams {
        temp_in: -30.0,
        temp_out: -25.0,
        c_liquid: 2000.0,
        flow_rate: 1.5,
    });
    let profile = LiquidProfile::new(FEA_PROFILE.to_vec()).unwrap();
    let liquid = model.liquid_temperatures(&profile);
    assert_eq!(liquid.len(), 29);
    assert!((liquid[0] + 30.0).abs() < 1e-12);
    assert!((liquid[28] + 25.0).abs() < 1e-12);
    assert!(liquid.windows(2).all(|w| w[0] < w[1]));

    let imp = model.impedances(&[-20.0; 28], &profile, None).unwrap();
    assert_eq!(imp.len(), 28);
    assert!(imp.iter().all(|v| v.is_finite() && *v > 0.0));
}

#[test]
fn correction_only_touches_connector_neighbours() {
    init_logger();
    let coolant = CoolantParams {
        temp_in: -30.0,
        temp_out: -25.0,
        c_liquid: 2000.0,
        flow_rate: 1.5,
    };
    let model = ImpedanceModel::new(coolant);
    let profile = LiquidProfile::new(FEA_PROFILE.to_vec()).unwrap();
    let temps = [-20.0; 28];
    let correction = HeatCorrection::end_of_stave(&profile, &coolant, 0.05).unwrap();

    let plain = model.impedances(&temps, &profile, None).unwrap();
    let corrected = model
        .impedances(&temps, &profile, Some(&correction))
        .unwrap();
    assert_ne!(plain[0], corrected[0]);
    assert_ne!(plain[1], corrected[1]);
    assert_eq!(plain[2..], corrected[2..]);

    let again = HeatCorrection::end_of_stave(&profile, &coolant, 0.05).unwrap();
    assert_eq!(correction, again);
}

#[test]
fn combined_small_region_impedance() {
    init_logger();
    let outbound = [2.0, 4.0, 8.0];
    let inbound = [8.0, 4.0, 2.0];
    assert_eq!(
        combine_parallel(&outbound, &inbound).unwrap(),
        vec![1.0, 2.0, 4.0]
    );
}
