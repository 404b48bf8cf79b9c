//! Runs acceptance suites against a live manager on the loopback interface.

#![cfg(unix)]

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use clara_config::{
    ClaraConfig, DaemonConfig, Endpoint, EnvOverlay, LanguageConfig, RetryPolicy,
};
use clara_manager::{Dispatcher, RunningServer, Server, Supervisor, SupervisorSettings};

const LIFECYCLE_SUITE: &str = "\
tests:
  - actions:
      - start platform
      - 'start {{item}} dpe on platform'
    result: ['']
  - actions: [request list dpes]
    result: [list-dpes]
  - actions: [stop platform]
    result: ['']
";

const FAILING_SUITE: &str = "\
name: stop-without-start
tests:
  - actions: [stop platform]
    result: ['']
";

struct Deployment {
    dir: TempDir,
    config: Utf8PathBuf,
    server: Option<RunningServer>,
}

impl Drop for Deployment {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.shutdown().expect("server shuts down");
        }
    }
}

fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path).expect("utf-8 path")
}

#[fixture]
fn deployment() -> Deployment {
    let dir = TempDir::new().expect("temp dir");
    let root = utf8(dir.path().to_path_buf());
    let clara = ClaraConfig {
        services: root.clone(),
        logs: root.join("log"),
        host_ip: Some(String::from("127.0.0.1")),
        languages: BTreeMap::from([(
            String::from("java"),
            LanguageConfig {
                fullpath: root.clone(),
                platform: String::from("sleep 30"),
                dpe: String::from("sleep 30"),
                orchestrator: Some(String::from("echo")),
                env: EnvOverlay::None,
            },
        )]),
    };
    let daemon = DaemonConfig {
        start_probe: RetryPolicy::new(2, 50),
        stop_probe: RetryPolicy::new(10, 50),
        ..DaemonConfig::default()
    };
    let supervisor = Supervisor::new(SupervisorSettings::new(clara, &daemon));
    let server = Server::bind(&Endpoint::tcp("127.0.0.1", 0), Dispatcher::new(supervisor))
        .expect("bind manager");
    let port = server.local_addr().expect("manager address").port();
    let server = server.start().expect("start manager");

    fs::create_dir(root.join("suites")).expect("create suite dir");
    let config = root.join("config.yaml");
    let text = format!(
        "logging:\n  filter: warn\ndaemon:\n  port: {port}\n\
         nodes:\n  platform: 127.0.0.1\ntests: suites\n"
    );
    fs::write(&config, text).expect("write config");

    Deployment {
        dir,
        config,
        server: Some(server),
    }
}

impl Deployment {
    fn suite(&self, name: &str, text: &str) {
        fs::write(self.dir.path().join("suites").join(name), text).expect("write suite");
    }

    fn run(&self) -> (ExitCode, String, String) {
        let args: Vec<OsString> = vec![
            "clara-acceptance".into(),
            "--config-path".into(),
            self.config.as_str().into(),
        ];
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit = clara_testing::run(args, &mut stdout, &mut stderr);
        (
            exit,
            String::from_utf8(stdout).expect("utf-8 stdout"),
            String::from_utf8(stderr).expect("utf-8 stderr"),
        )
    }
}

#[rstest]
fn lifecycle_suite_passes(deployment: Deployment) {
    deployment.suite("lifecycle.yaml", LIFECYCLE_SUITE);

    let (exit, stdout, stderr) = deployment.run();

    assert_eq!(stdout, "PASS lifecycle\n1 passed, 0 failed\n", "stderr: {stderr}");
    assert_eq!(exit, ExitCode::SUCCESS);
}

#[rstest]
fn failing_suite_is_reported_and_run_continues(deployment: Deployment) {
    deployment.suite("a-failing.yaml", FAILING_SUITE);
    deployment.suite("b-lifecycle.yaml", LIFECYCLE_SUITE);

    let (exit, stdout, _) = deployment.run();

    assert_eq!(
        stdout,
        "FAIL stop-without-start\nPASS b-lifecycle\n1 passed, 1 failed\n"
    );
    assert_eq!(exit, ExitCode::FAILURE);
}
