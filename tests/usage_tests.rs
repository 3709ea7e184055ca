use base64::Engine as _;
use device_telemetry::collectors::{AppOpsGate, PermissionGate, UsageAggregator};
use device_telemetry::icon::IconRenderer;
use device_telemetry::platform::android::{OpMode, UsageStats};
use device_telemetry::platform::simulated::{AndroidProfile, IconSpec, SimulatedAndroid, SimulatedPackage};

fn screen_time(device: &SimulatedAndroid) -> Vec<device_telemetry::models::UsageRecord> {
    let gate = AppOpsGate::new(device);
    let renderer = IconRenderer::default();
    UsageAggregator::new(device, &gate, &renderer).screen_time().unwrap()
}

#[test]
fn test_background_system_package_is_excluded() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.sys.helper").system().launchable(false).foreground_secs(120),
    ]);

    let records = screen_time(&device);
    assert!(records.iter().all(|r| r.package_id != "com.sys.helper"));
    assert!(records.is_empty());
}

#[test]
fn test_launchable_system_package_is_included() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.app.browser").with_label(Some("Browser")).system().launchable(true).foreground_secs(300),
    ]);

    let records = screen_time(&device);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].package_id, "com.app.browser");
    assert_eq!(records[0].display_name, "Browser");
    assert_eq!(records[0].seconds_foreground, 300);
}

#[test]
fn test_updated_system_package_is_included_without_launcher() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.google.webview").updated_system().launchable(false).foreground_secs(45),
    ]);

    let records = screen_time(&device);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].seconds_foreground, 45);
}

#[test]
fn test_zero_and_sub_second_usage_is_excluded() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.zero").foreground_ms(0),
        SimulatedPackage::new("com.blink").foreground_ms(999),
        SimulatedPackage::new("com.used").foreground_ms(1_500),
    ]);

    let records = screen_time(&device);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].package_id, "com.used");
    assert_eq!(records[0].seconds_foreground, 1);
    assert!(records.iter().all(|r| r.seconds_foreground > 0));
}

#[test]
fn test_sorted_descending_with_stable_ties() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.a").foreground_secs(60),
        SimulatedPackage::new("com.b").foreground_secs(600),
        SimulatedPackage::new("com.c").foreground_secs(60),
        SimulatedPackage::new("com.d").foreground_secs(3600),
    ]);

    let records = screen_time(&device);
    let order: Vec<&str> = records.iter().map(|r| r.package_id.as_str()).collect();
    assert_eq!(order, vec!["com.d", "com.b", "com.a", "com.c"]);
    assert!(records.windows(2).all(|w| w[0].seconds_foreground >= w[1].seconds_foreground));
}

#[test]
fn test_no_permission_returns_empty_not_error() {
    let device = SimulatedAndroid::from_profile(AndroidProfile {
        usage_access: OpMode::Ignored,
        packages: vec![SimulatedPackage::new("com.a").foreground_secs(600)],
        ..Default::default()
    });

    let gate = AppOpsGate::new(&device);
    assert!(!gate.has_usage_access());

    let renderer = IconRenderer::default();
    let records = UsageAggregator::new(&device, &gate, &renderer).screen_time();
    assert!(records.unwrap().is_empty());
}

#[test]
fn test_permission_is_requeried_every_call() {
    let device = SimulatedAndroid::with_packages(vec![SimulatedPackage::new("com.a").foreground_secs(10)]);
    assert_eq!(screen_time(&device).len(), 1);

    device.set_usage_access(OpMode::Ignored);
    assert!(screen_time(&device).is_empty());

    device.set_usage_access(OpMode::Allowed);
    assert_eq!(screen_time(&device).len(), 1);
}

#[test]
fn test_default_op_mode_falls_back_to_permission() {
    let granted = SimulatedAndroid::from_profile(AndroidProfile {
        usage_access: OpMode::Default,
        usage_permission_granted: true,
        ..Default::default()
    });
    assert!(AppOpsGate::new(&granted).has_usage_access());

    let denied = SimulatedAndroid::from_profile(AndroidProfile {
        usage_access: OpMode::Default,
        usage_permission_granted: false,
        ..Default::default()
    });
    assert!(!AppOpsGate::new(&denied).has_usage_access());
}

#[test]
fn test_uninstalled_package_usage_is_skipped() {
    let device = SimulatedAndroid::from_profile(AndroidProfile {
        usage_access: OpMode::Allowed,
        packages: vec![SimulatedPackage::new("com.kept").foreground_secs(30)],
        orphan_usage: vec![UsageStats {
            package_name: "com.gone".to_string(),
            total_time_in_foreground_ms: 90_000,
            last_time_used_ms: 0,
        }],
        ..Default::default()
    });

    let records = screen_time(&device);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].package_id, "com.kept");
}

#[test]
fn test_label_fallback_and_inline_icon() {
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.nolabel").with_label(None).foreground_secs(5),
        SimulatedPackage::new("com.noicon").with_icon(None).foreground_secs(4),
    ]);

    let records = screen_time(&device);
    let nolabel = records.iter().find(|r| r.package_id == "com.nolabel").unwrap();
    assert_eq!(nolabel.display_name, "com.nolabel");

    let encoded = nolabel.icon_ref.as_ref().expect("inline icon");
    let png = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 64));

    let noicon = records.iter().find(|r| r.package_id == "com.noicon").unwrap();
    assert_eq!(noicon.icon_ref, None);
}

#[test]
fn test_empty_raster_icon_only_drops_that_icon() {
    let empty = IconSpec::Raster { rgba: [0, 0, 0, 255], width: 0, height: 0 };
    let device = SimulatedAndroid::with_packages(vec![
        SimulatedPackage::new("com.good").foreground_secs(100),
        SimulatedPackage::new("com.bad").with_icon(Some(empty)).foreground_secs(50),
    ]);

    let records = screen_time(&device);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].package_id, "com.good");
    assert!(records[0].icon_ref.is_some());

    assert_eq!(records[1].package_id, "com.bad");
    assert_eq!(records[1].seconds_foreground, 50);
    assert_eq!(records[1].icon_ref, None);
}
