use predicates::prelude::*;

use super::common::{FAKE_NINJA, TestEnv};

const WORD_COUNT_STAGES: [&str; 4] = ["driver", "splitter", "mapper", "reducer"];

#[test]
fn workflows_build_publishes_every_stage() {
  let env = TestEnv::new();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Built workflows"))
    .stdout(predicate::str::contains("Published: 4"));

  assert_eq!(
    env.builds(),
    vec![
      "word-count_driver",
      "word-count_splitter",
      "word-count_mapper",
      "word-count_reducer"
    ]
  );
  assert_eq!(env.generate_count(), 1);
  for stage in WORD_COUNT_STAGES {
    let published = env.published("word-count", stage);
    let content = std::fs::read_to_string(&published).unwrap();
    assert_eq!(content.trim(), format!("wasm word-count_{}", stage));
  }
}

#[test]
fn second_run_skips_generation() {
  let env = TestEnv::new();

  for _ in 0..2 {
    env
      .wbuild_cmd()
      .args(["workflows", "--workflow", "word-count"])
      .assert()
      .success();
  }

  assert_eq!(env.generate_count(), 1);
  assert_eq!(env.builds().len(), 8);
}

#[test]
fn clean_run_regenerates_every_unit() {
  let env = TestEnv::new();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count", "--clean"])
    .assert()
    .success();

  let log = env.log();
  assert_eq!(log.len(), 8);
  for pair in log.chunks(2) {
    assert!(pair[0].starts_with("generate "), "unexpected order: {:?}", log);
    assert!(pair[1].starts_with("build "), "unexpected order: {:?}", log);
  }
  for stage in WORD_COUNT_STAGES {
    assert!(env.published("word-count", stage).is_file());
  }
}

#[test]
fn debug_flag_changes_generation() {
  let env = TestEnv::new();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count"])
    .assert()
    .success();
  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count", "--debug"])
    .assert()
    .success();

  let generates: Vec<String> = env.log().into_iter().filter(|l| l.starts_with("generate ")).collect();
  assert_eq!(generates.len(), 2);
  assert!(generates[0].contains("-DCMAKE_BUILD_TYPE=Release"));
  assert!(generates[1].contains("-DCMAKE_BUILD_TYPE=Debug"));
}

#[test]
fn native_target_does_not_publish() {
  let env = TestEnv::new();
  let certs = env.temp.path().join("certs");
  std::fs::create_dir_all(&certs).unwrap();
  std::fs::write(certs.join("ca.pem"), "cert").unwrap();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "finra", "--target", "native", "--as-cert-dir"])
    .arg(&certs)
    .assert()
    .success()
    .stdout(predicate::str::contains("Published: 0"));

  assert!(env.build_dir("workflows", "build-native").is_dir());
  assert!(!env.build_dir("workflows", "build-wasm").exists());
  assert!(!env.store_path().exists());
  let generates: Vec<String> = env.log().into_iter().filter(|l| l.starts_with("generate ")).collect();
  assert!(generates[0].contains("-DAS_CERT_DIR="));
}

#[test]
fn empty_cert_dir_warns_and_builds() {
  let env = TestEnv::new();
  let certs = env.temp.path().join("certs");
  std::fs::create_dir_all(&certs).unwrap();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count", "--as-cert-dir"])
    .arg(&certs)
    .assert()
    .success()
    .stderr(predicate::str::contains("trust-material directory is empty"));

  assert_eq!(env.builds().len(), 4);
}

#[test]
fn build_failure_stops_the_run() {
  let env = TestEnv::new();
  env.write_tool(
    "ninja",
    r#"echo "build $1" >> "$WBUILD_TEST_LOG"
echo "undefined reference to main" >&2
exit 1"#,
  );

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("word-count_driver"))
    .stderr(predicate::str::contains("undefined reference to main"));

  assert_eq!(env.builds(), vec!["word-count_driver"]);
  assert!(!env.published("word-count", "driver").exists());
}

#[test]
fn json_report_lists_units() {
  let env = TestEnv::new();

  let output = env
    .wbuild_cmd()
    .args(["-o", "json", "workflows", "--workflow", "word-count"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let units = json["units"].as_array().unwrap();
  assert_eq!(units.len(), 4);
  assert_eq!(units[0]["scope"], "word-count_driver");
  assert_eq!(units[0]["target"], "bytecode");
  assert_eq!(units[0]["regenerated"], true);
  assert_eq!(units[1]["regenerated"], false);
}

#[test]
fn custom_catalog_is_used() {
  let env = TestEnv::new();
  let catalog = env.temp.path().join("catalog.json");
  std::fs::write(
    &catalog,
    r#"{"workflows":[{"name":"hello","stages":["a","b"]}]}"#,
  )
  .unwrap();

  env
    .wbuild_cmd()
    .arg("workflows")
    .arg("--catalog")
    .arg(&catalog)
    .assert()
    .success();

  assert_eq!(env.builds(), vec!["hello_a", "hello_b"]);
  assert!(env.published("hello", "b").is_file());
}

#[test]
fn clean_resets_build_dirs_of_every_target() {
  let env = TestEnv::new();
  let native = env.build_dir("workflows", "build-native");
  std::fs::create_dir_all(&native).unwrap();
  std::fs::write(native.join("stale.o"), "old").unwrap();

  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count", "--clean"])
    .assert()
    .success();

  assert!(!native.join("stale.o").exists());
  assert!(env.builds().iter().all(|scope| scope.starts_with("word-count_")));
  assert_eq!(env.builds().len(), 4);
}

#[test]
fn toolchain_output_reaches_the_user() {
  let env = TestEnv::new();
  env.write_tool(
    "ninja",
    &format!(
      "echo \"[1/2] Compiling $1\"\necho \"warning: implicit conversion in $1\" >&2\n{}",
      FAKE_NINJA
    ),
  );

  let output = env
    .wbuild_cmd()
    .args(["-o", "json", "workflows", "--workflow", "word-count"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("[1/2] Compiling word-count_driver"), "stderr: {stderr}");
  assert!(stderr.contains("warning: implicit conversion in word-count_reducer"), "stderr: {stderr}");

  // child output never mixes into the JSON report
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["units"].as_array().unwrap().len(), 4);
}
