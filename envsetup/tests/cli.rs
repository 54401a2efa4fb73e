//! End-to-end runs of the envsetup binary against a fake interpreter.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_prints() {
    Command::cargo_bin("envsetup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ENVIRONMENT"));
}

#[test]
fn missing_environment_exits_1_with_usage() {
    Command::cargo_bin("envsetup")
        .unwrap()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Stands in for `python3`: answers the probes, builds a venv by copying
    /// itself, logs pip calls, and runs `*.py` scripts with sh.
    const FAKE_PYTHON: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "Python 3.12.0"
    exit 0
    ;;
  -c)
    exit 0
    ;;
  -m)
    case "$2" in
      venv)
        mkdir -p "$3/bin" && cp "$0" "$3/bin/python" && chmod +x "$3/bin/python"
        exit $?
        ;;
      pip)
        echo "$*" >> "$FAKE_PIP_LOG"
        if [ "$4" = "--upgrade" ] && [ -n "$FAKE_PIP_UPGRADE_FAIL" ]; then
          exit 1
        fi
        exit 0
        ;;
    esac
    exit 1
    ;;
esac
script="$1"
shift
exec /bin/sh "$script" "$@"
"#;

    struct Project {
        dir: TempDir,
        python: PathBuf,
    }

    impl Project {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let tools = dir.path().join("tools");
            fs::create_dir(&tools).unwrap();

            let python = tools.join("python3");
            fs::write(&python, FAKE_PYTHON).unwrap();
            fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();

            Self { dir, python }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn write(&self, name: &str, content: &str) -> &Self {
            fs::write(self.path().join(name), content).unwrap();
            self
        }

        fn pip_log(&self) -> PathBuf {
            self.path().join("pip.log")
        }

        fn pip_calls(&self) -> String {
            fs::read_to_string(self.pip_log()).unwrap_or_default()
        }

        fn cmd(&self, environment: &str) -> Command {
            let mut cmd = Command::cargo_bin("envsetup").unwrap();
            cmd.arg("-C")
                .arg(self.path())
                .arg("--python")
                .arg(&self.python)
                .arg(environment)
                .env("FAKE_PIP_LOG", self.pip_log())
                .env_remove("FAKE_PIP_UPGRADE_FAIL")
                .env_remove("RUST_LOG");
            cmd
        }
    }

    fn ready_project() -> Project {
        let project = Project::new();
        project
            .write("config.yml", "devs: alice, bob\nproject: atlas\n")
            .write("requirements.txt", "pyyaml\n")
            .write("env_dev.py", "echo \"$VIRTUAL_ENV\" > dispatched\n");
        project
    }

    #[test]
    fn full_setup_succeeds() {
        let project = ready_project();

        project
            .cmd("dev")
            .assert()
            .success()
            .stderr(predicate::str::contains("[1/5]"))
            .stderr(predicate::str::contains("Environment 'dev' setup complete"));

        let venv = project.path().join(".venv");
        assert!(venv.join("bin/python").exists());
        assert!(venv.join("envsetup.json").exists());

        let dispatched = fs::read_to_string(project.path().join("dispatched")).unwrap();
        assert_eq!(dispatched.trim(), venv.display().to_string());

        let pip = project.pip_calls();
        assert!(pip.contains("-m pip install --upgrade pip"));
        assert!(pip.contains("-m pip install -r"));
    }

    #[test]
    fn existing_venv_is_reused_with_warning() {
        let project = ready_project();
        project.cmd("dev").assert().success();
        let marker = project.path().join(".venv/keep");
        fs::write(&marker, "").unwrap();

        project
            .cmd("dev")
            .assert()
            .success()
            .stderr(predicate::str::contains("[WARNING]"))
            .stderr(predicate::str::contains("already exists"));

        assert!(marker.exists());
    }

    #[test]
    fn recreate_venv_rebuilds_it() {
        let project = ready_project();
        project.cmd("dev").assert().success();
        let marker = project.path().join(".venv/keep");
        fs::write(&marker, "").unwrap();

        project.cmd("dev").arg("--recreate-venv").assert().success();

        assert!(!marker.exists());
        assert!(project.path().join(".venv/bin/python").exists());
    }

    #[test]
    fn missing_requirements_is_skipped() {
        let project = Project::new();
        project
            .write("config.yml", "")
            .write("env_dev.py", "exit 0\n");

        project
            .cmd("dev")
            .assert()
            .success()
            .stderr(predicate::str::contains("skipping dependency installation"));

        assert!(!project.pip_calls().contains("-r"));
    }

    #[test]
    fn missing_config_fails_before_dispatch() {
        let project = Project::new();
        project
            .write("requirements.txt", "")
            .write("env_dev.py", "touch dispatched\n");

        project
            .cmd("dev")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Configuration file not found"));

        assert!(!project.path().join("dispatched").exists());
    }

    #[test]
    fn unknown_environment_fails_after_setup() {
        let project = ready_project();

        project
            .cmd("staging")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("env_staging.py"));

        assert!(project.path().join(".venv").exists());
        assert!(project.pip_calls().contains("-r"));
    }

    #[test]
    fn failing_script_exits_1() {
        let project = ready_project();
        project.write("env_prod.py", "exit 7\n");

        project
            .cmd("prod")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("exit code 7"));
    }

    #[test]
    fn pip_upgrade_failure_only_warns() {
        let project = ready_project();

        project
            .cmd("dev")
            .env("FAKE_PIP_UPGRADE_FAIL", "1")
            .assert()
            .success()
            .stderr(predicate::str::contains("Failed to upgrade pip"));
    }

    #[test]
    fn missing_python_lists_all_dependencies() {
        let project = ready_project();

        Command::cargo_bin("envsetup")
            .unwrap()
            .arg("-C")
            .arg(project.path())
            .args(["--python", "/nonexistent/bin/python3", "dev"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("python3, python3-venv"));

        assert!(!project.path().join(".venv").exists());
    }

    #[test]
    fn script_args_are_forwarded() {
        let project = ready_project();
        project.write("env_ci.py", "echo \"$@\" > forwarded\n");

        project
            .cmd("ci")
            .args(["--", "--shard", "2"])
            .assert()
            .success();

        let forwarded = fs::read_to_string(project.path().join("forwarded")).unwrap();
        assert_eq!(forwarded.trim(), "--shard 2");
    }

    #[test]
    fn validate_config_rejects_malformed_yaml() {
        let project = ready_project();
        project.write("config.yml", "devs: [alice\n");

        project
            .cmd("dev")
            .arg("--validate-config")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid configuration file"));

        assert!(!project.path().join("dispatched").exists());
    }

    #[test]
    fn settings_file_overrides_layout() {
        let project = ready_project();
        project.write("envsetup.toml", "venv_dir = \"build/venv\"\nupgrade_pip = false\n");

        project.cmd("dev").assert().success();

        assert!(project.path().join("build/venv/bin/python").exists());
        assert!(!project.pip_calls().contains("--upgrade"));
    }

    #[test]
    fn relative_project_dir_dispatches() {
        let root = Project::new();
        let proj = root.path().join("proj");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("config.yml"), "").unwrap();
        fs::write(proj.join("requirements.txt"), "").unwrap();
        fs::write(proj.join("env_dev.py"), "echo \"$VIRTUAL_ENV\" > dispatched\n").unwrap();

        Command::cargo_bin("envsetup")
            .unwrap()
            .current_dir(root.path())
            .args(["-C", "proj", "--python"])
            .arg(&root.python)
            .arg("dev")
            .env("FAKE_PIP_LOG", root.pip_log())
            .env_remove("FAKE_PIP_UPGRADE_FAIL")
            .assert()
            .success();

        let dispatched = fs::read_to_string(proj.join("dispatched")).unwrap();
        let virtual_env = PathBuf::from(dispatched.trim());
        assert!(virtual_env.is_absolute());
        assert!(virtual_env.ends_with("proj/.venv"));
        assert!(proj.join(".venv/bin/python").exists());
        assert!(!proj.join("proj").exists());
    }

    #[test]
    fn reused_venv_from_other_python_warns() {
        let project = ready_project();
        project.cmd("dev").assert().success();

        let stamp = project.path().join(".venv/envsetup.json");
        let content = fs::read_to_string(&stamp)
            .unwrap()
            .replace("Python 3.12.0", "Python 3.9.0");
        assert!(content.contains("Python 3.9.0"));
        fs::write(&stamp, content).unwrap();

        project
            .cmd("dev")
            .assert()
            .success()
            .stderr(predicate::str::contains("Python 3.9.0"))
            .stderr(predicate::str::contains("--recreate-venv"));
    }

    #[test]
    fn matching_stamp_has_no_drift_warning() {
        let project = ready_project();
        project.cmd("dev").assert().success();

        project
            .cmd("dev")
            .assert()
            .success()
            .stderr(predicate::str::contains("--recreate-venv").not());
    }

    #[test]
    fn validate_config_warns_without_devs() {
        let project = ready_project();
        project.write("config.yml", "project: atlas\n");

        project
            .cmd("dev")
            .arg("--validate-config")
            .assert()
            .success()
            .stderr(predicate::str::contains("No developers specified"))
            .stderr(predicate::str::contains("Shared project: atlas"));

        assert!(project.path().join("dispatched").exists());
    }

    #[test]
    fn validate_config_lists_devs() {
        let project = ready_project();

        project
            .cmd("dev")
            .arg("--validate-config")
            .assert()
            .success()
            .stderr(predicate::str::contains("Developers: alice, bob"))
            .stderr(predicate::str::contains("No developers specified").not());
    }
}
