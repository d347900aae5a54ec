use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn apps_build_native_unscoped() {
  let env = TestEnv::new();

  env.wbuild_cmd().arg("apps").assert().success();

  assert_eq!(env.builds(), vec!["all"]);
  assert!(env.build_dir("applications", "build-native").is_dir());
  assert!(!env.build_dir("applications", "build-wasm").exists());
  assert!(!env.store_path().exists());
}

#[test]
fn ubench_builds_both_targets_with_timing() {
  let env = TestEnv::new();

  env
    .wbuild_cmd()
    .args(["ubench", "--time"])
    .assert()
    .success()
    .stdout(predicate::str::contains("ubench-cold-start [bytecode]"))
    .stdout(predicate::str::contains("ubench-cold-start [native]"));

  assert_eq!(env.builds(), vec!["ubench-cold-start", "ubench-cold-start"]);
  let generates: Vec<String> = env.log().into_iter().filter(|l| l.starts_with("generate ")).collect();
  assert_eq!(generates.len(), 2);
  for line in &generates {
    assert!(line.contains("-DWBUILD_UBENCH=ON"), "missing timing flag: {}", line);
    assert!(line.ends_with("/ubench/cold-start"), "wrong source dir: {}", line);
  }
}
