use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_removes_build_dirs() {
  let env = TestEnv::new();
  env
    .wbuild_cmd()
    .args(["workflows", "--workflow", "word-count", "--target", "bytecode", "--target", "native"])
    .assert()
    .success();
  assert!(env.build_dir("workflows", "build-wasm").is_dir());
  assert!(env.build_dir("workflows", "build-native").is_dir());

  env
    .wbuild_cmd()
    .args(["clean", "--project", "workflows"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Directories removed: 2"));

  assert!(!env.build_dir("workflows", "build-wasm").exists());
  assert!(!env.build_dir("workflows", "build-native").exists());
  // the function store belongs to the runtime
  assert!(env.published("word-count", "driver").is_file());
}

#[test]
fn clean_does_not_need_container() {
  let env = TestEnv::new();
  env.wbuild_cmd().arg("apps").assert().success();

  env
    .wbuild_cmd()
    .env_remove("WBUILD_IN_CONTAINER")
    .arg("clean")
    .assert()
    .success();

  assert!(!env.build_dir("applications", "build-native").exists());
}

#[test]
fn build_after_clean_regenerates() {
  let env = TestEnv::new();
  env.wbuild_cmd().arg("apps").assert().success();
  env.wbuild_cmd().arg("clean").assert().success();
  env.wbuild_cmd().arg("apps").assert().success();

  assert_eq!(env.generate_count(), 2);
}
