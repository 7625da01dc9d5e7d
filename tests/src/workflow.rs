use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use rdpgate_common::config::{Config, Mode};
use rdpgate_common::network::gateway::Selection;
use rdpgate_core::generate::{GenerateService, RunOutcome};
use rdpgate_core::launch::LaunchOutcome;
use rdpgate_core::render::RenderStage;
use rdpgate_core::testing::{
    FailingInterfaces, FakeInterfaces, FaultyFiles, RecordingLauncher, ScriptedConsole,
};
use tempfile::tempdir;

use crate::support::ni;

#[cfg(windows)]
const EOL: &str = "\r\n";
#[cfg(not(windows))]
const EOL: &str = "\n";

const TEMPLATE: &str = "full address:s:${DefaultGateway}\n";

fn service(interfaces: FakeInterfaces) -> GenerateService {
    GenerateService::new(Box::new(interfaces), Box::new(RecordingLauncher::new(false)))
}

fn write_template(dir: &Path, contents: &str) {
    fs::write(dir.join("template.txt"), contents).unwrap();
}

fn home_router() -> FakeInterfaces {
    FakeInterfaces::new(vec![ni("eth0", &["192.168.1.20"], &["192.168.1.1"])])
}

/*************************************************************
                      Automatic mode
**************************************************************/

#[test]
fn single_gateway_is_written_without_prompting() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let mut console = ScriptedConsole::default();

    let outcome = service(home_router()).run(&cfg, &mut console).unwrap();

    assert!(outcome.is_success(), "unexpected outcome: {outcome:?}");
    assert!(console.prompts.is_empty());
    assert_eq!(
        fs::read_to_string(&cfg.output_path).unwrap(),
        format!("full address:s:192.168.1.1{EOL}")
    );
    assert!(!cfg.temp_path.exists());
}

#[test]
fn every_placeholder_is_replaced() {
    let dir = tempdir().unwrap();
    write_template(
        dir.path(),
        "full address:s:${DefaultGateway}\ngatewayhostname:s:${DefaultGateway}\nalternate:s:${DefaultGateway}${DefaultGateway}\n",
    );
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);

    let outcome = service(home_router())
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(outcome.is_success());
    let output = fs::read_to_string(&cfg.output_path).unwrap();
    assert_eq!(output.matches("192.168.1.1").count(), 4);
    assert!(!output.contains("${DefaultGateway}"));
}

#[test]
fn several_gateways_require_an_index() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let interfaces = FakeInterfaces::new(vec![
        ni("eth0", &["192.168.1.20"], &["192.168.1.1"]),
        ni("wlan0", &["10.0.0.7"], &["10.0.0.1"]),
    ]);
    let mut console = ScriptedConsole::with_lines(&["10.0.0.1", "2", "1"]);

    let outcome = service(interfaces).run(&cfg, &mut console).unwrap();

    match outcome {
        RunOutcome::Generated { selection, launch } => {
            assert_eq!(selection, Selection::new(Ipv4Addr::new(10, 0, 0, 1)));
            assert!(launch.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(console.prompts.len(), 3);
    assert!(console.printed.contains(&"Selected [1] 10.0.0.1".to_string()));
}

#[test]
fn existing_output_stops_before_enumeration() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    fs::write(&cfg.output_path, "keep me").unwrap();
    let interfaces = home_router();
    let queries = interfaces.queries.clone();

    let outcome = service(interfaces)
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(matches!(outcome, RunOutcome::OutputExists));
    assert_eq!(*queries.borrow(), 0);
    assert_eq!(fs::read_to_string(&cfg.output_path).unwrap(), "keep me");
    assert!(!cfg.temp_path.exists());
}

#[test]
fn missing_template_stops_before_enumeration() {
    let dir = tempdir().unwrap();
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    let interfaces = home_router();
    let queries = interfaces.queries.clone();

    let outcome = service(interfaces)
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(matches!(outcome, RunOutcome::TemplateMissing));
    assert_eq!(*queries.borrow(), 0);
    assert!(!cfg.output_path.exists());
}

#[test]
fn no_gateway_ends_without_touching_files() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let no_route = ni("eth0", &["192.168.1.20"], &[]);
    let mut virtual_nic = ni("vEthernet (WSL)", &["172.20.0.1"], &["172.20.0.254"]);
    virtual_nic.description = "Hyper-V Virtual Ethernet Adapter".into();
    let interfaces = FakeInterfaces::new(vec![no_route, virtual_nic]);

    let outcome = service(interfaces)
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NoGateway));
    assert!(!cfg.temp_path.exists());
    assert!(!cfg.output_path.exists());
}

#[test]
fn interface_query_failure_is_fatal() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let service = GenerateService::new(
        Box::new(FailingInterfaces),
        Box::new(RecordingLauncher::new(false)),
    );

    let result = service.run(&cfg, &mut ScriptedConsole::default());

    assert!(result.is_err());
    assert!(!cfg.temp_path.exists());
}

#[test]
fn unreadable_template_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    fs::create_dir(&cfg.template_path).unwrap();

    let outcome = service(home_router())
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    match outcome {
        RunOutcome::RenderFailed(e) => {
            assert_eq!(e.stage, RenderStage::ReadTemplate);
            assert!(e.cleanup.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!cfg.temp_path.exists());
    assert!(!cfg.output_path.exists());
}

#[test]
fn utf16_template_from_remote_desktop_client_is_rendered() {
    let dir = tempdir().unwrap();
    let mut bytes = vec![0xff, 0xfe];
    bytes.extend(
        "full address:s:${DefaultGateway}\r\n"
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes()),
    );
    fs::write(dir.path().join("template.txt"), bytes).unwrap();
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);

    let outcome = service(home_router())
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(outcome.is_success(), "unexpected outcome: {outcome:?}");
    assert_eq!(
        fs::read_to_string(&cfg.output_path).unwrap(),
        format!("full address:s:192.168.1.1{EOL}")
    );
}

#[test]
fn render_and_cleanup_failures_are_both_reported() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let files = FaultyFiles {
        fail_write: true,
        fail_remove: true,
        ..FaultyFiles::default()
    };

    let outcome = service(home_router())
        .with_files(Box::new(files))
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    match outcome {
        RunOutcome::RenderFailed(e) => {
            assert_eq!(e.stage, RenderStage::WriteTemp);
            assert!(e.cleanup.is_some());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(cfg.temp_path.exists());
    assert!(!cfg.output_path.exists());
}

#[test]
fn leftover_temp_file_does_not_fail_the_run() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Automatic);
    let files = FaultyFiles {
        fail_remove: true,
        ..FaultyFiles::default()
    };

    let outcome = service(home_router())
        .with_files(Box::new(files))
        .run(&cfg, &mut ScriptedConsole::default())
        .unwrap();

    assert!(outcome.is_success(), "unexpected outcome: {outcome:?}");
    assert_eq!(
        fs::read_to_string(&cfg.output_path).unwrap(),
        format!("full address:s:192.168.1.1{EOL}")
    );
    assert!(cfg.temp_path.exists());
}

/*************************************************************
                        Manual mode
**************************************************************/

#[test]
fn typed_address_and_port_are_substituted() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    let mut console = ScriptedConsole::with_lines(&["10.0.0.1", "3390"]);

    let outcome = service(home_router()).run(&cfg, &mut console).unwrap();

    match outcome {
        RunOutcome::Generated { selection, launch } => {
            assert_eq!(selection.to_string(), "10.0.0.1:3390");
            assert!(matches!(launch, Some(LaunchOutcome::Unsupported)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(&cfg.output_path).unwrap(),
        format!("full address:s:10.0.0.1:3390{EOL}")
    );
    assert!(!cfg.temp_path.exists());
}

#[test]
fn invalid_port_keeps_default_and_existing_output_is_overwritten() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    fs::write(&cfg.output_path, "old").unwrap();
    let mut console = ScriptedConsole::with_lines(&["0", "99999"]);

    let outcome = service(home_router()).run(&cfg, &mut console).unwrap();

    assert!(outcome.is_success());
    assert_eq!(
        fs::read_to_string(&cfg.output_path).unwrap(),
        format!("full address:s:192.168.1.1{EOL}")
    );
}

#[test]
fn confirmed_launch_opens_output_file() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    let launcher = RecordingLauncher::new(true);
    let launched = launcher.launched.clone();
    let service = GenerateService::new(Box::new(home_router()), Box::new(launcher));
    let mut console = ScriptedConsole::with_lines(&["0", ""]).with_keys(&['y']);

    let outcome = service.run(&cfg, &mut console).unwrap();

    match outcome {
        RunOutcome::Generated { launch, .. } => {
            assert!(matches!(launch, Some(LaunchOutcome::Launched)));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let launched = launched.borrow();
    assert_eq!(launched.len(), 1);
    assert!(launched[0].is_absolute());
    assert!(launched[0].ends_with("output.rdp"));
}

#[test]
fn locked_output_reports_promotion_failure() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    let files = FaultyFiles {
        fail_copy: true,
        ..FaultyFiles::default()
    };
    let mut console = ScriptedConsole::with_lines(&["0", ""]);

    let outcome = service(home_router())
        .with_files(Box::new(files))
        .run(&cfg, &mut console)
        .unwrap();

    match outcome {
        RunOutcome::PromotionFailed(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!cfg.temp_path.exists());
    assert!(!cfg.output_path.exists());
}

#[test]
fn failed_promotion_reports_and_cleans_up() {
    let dir = tempdir().unwrap();
    write_template(dir.path(), TEMPLATE);
    let cfg = Config::in_dir(dir.path(), Mode::Manual);
    fs::create_dir(&cfg.output_path).unwrap();
    let mut console = ScriptedConsole::with_lines(&["0", ""]);

    let outcome = service(home_router()).run(&cfg, &mut console).unwrap();

    assert!(matches!(outcome, RunOutcome::PromotionFailed(_)));
    assert!(cfg.output_path.is_dir());
    assert!(!cfg.temp_path.exists());
}
