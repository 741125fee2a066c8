mod common;

use assert_matches::assert_matches;
use rstest::rstest;
use tempfile::TempDir;

use self::common::*;
use crate::config::TrackerPaths;
use crate::error::TrackerError;
use crate::persister::{artifact_path, load_report};
use crate::pipeline::{parse_deployments, record_infra};
use crate::store::{record_infrastructure, InfraStore};
use crate::types::{NetworkEnvironment, RunIdentity, VerificationStatus};

#[rstest]
#[tokio::test]
async fn recorded_snapshot_is_visible_to_later_steps(identity: RunIdentity, environments: Vec<NetworkEnvironment>) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());

    let recorded = record_infrastructure(&paths.infra_store(), &identity, environments).await.unwrap();

    // A later step is a fresh process: it only shares the workspace.
    let store = TrackerPaths::new(workspace.path()).infra_store();
    let read = store.read("deploy-contracts-42-deploy").await.unwrap().unwrap();
    assert_eq!(read, recorded);
    assert_eq!(read.networks.keys().collect::<Vec<_>>(), vec!["1", "8453", "10"]);
    assert_eq!(read.github_context, identity);
}

#[rstest]
#[tokio::test]
async fn parse_deployments_writes_grouped_artifact(identity: RunIdentity, environments: Vec<NetworkEnvironment>) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let store = paths.infra_store();
    record_infrastructure(&store, &identity, environments).await.unwrap();

    write_log(&paths.logs_dir, "mainnet.log", MAINNET_LOG);
    write_log(&paths.logs_dir, "base.txt", BASE_LOG);
    write_log(&paths.logs_dir, "notes.md", "## Start verifying contract `0xdead` deployed on 1");

    let outcome = parse_deployments(&store, &identity, &paths).await.unwrap();

    let destination = artifact_path(&paths.output_dir, "deploy-contracts-42-deploy");
    assert_eq!(outcome.written_to.as_deref(), Some(destination.as_path()));
    assert!(!paths.logs_dir.exists());

    let report = load_report(&destination).await.unwrap();
    assert_eq!(report, outcome.report);
    assert_eq!(report.workflow.run_number, 42);
    assert_eq!(report.workflow.run_id, 9_001_234);

    // Environment "10" received nothing and is omitted; the others follow snapshot order.
    let networks: Vec<_> = report.deployments.iter().map(|group| group.virtual_test_net.network_id.as_str()).collect();
    assert_eq!(networks, vec!["1", "8453"]);

    let mainnet = &report.deployments[0].contracts;
    assert_eq!(mainnet.len(), 2);
    assert_eq!(mainnet[0].contract_name.as_deref(), Some("Token"));
    assert_eq!(mainnet[0].verification_status, Some(VerificationStatus::Ok));
    assert_eq!(mainnet[0].optimizations, Some(200));
    assert_eq!(mainnet[1].contract_path.as_deref(), Some("src/Vault.sol"));
    assert_eq!(mainnet[1].verification_status, Some(VerificationStatus::NotOk));
    assert_eq!(mainnet[1].optimizations, None);

    let base = &report.deployments[1].contracts;
    assert_eq!(base.len(), 1);
    assert_eq!(base[0].address, "0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9");
    assert_eq!(base[0].verification_status, None);
}

#[rstest]
#[tokio::test]
async fn minimal_log_yields_one_contract(identity: RunIdentity) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let store = paths.infra_store();
    record_infrastructure(&store, &identity, vec![environment("1", 1)]).await.unwrap();

    write_log(&paths.logs_dir, "deploy.log", "##\nStart verifying contract `0xABCDEF0123` deployed on 1\n");

    let outcome = parse_deployments(&store, &identity, &paths).await.unwrap();
    let contracts = &outcome.report.deployments[0].contracts;
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].address, "0xABCDEF0123");
    assert_eq!(contracts[0].chain, "1");
    assert_eq!(contracts[0].compiler, None);
}

#[rstest]
#[tokio::test]
async fn missing_snapshot_fails_and_keeps_logs(identity: RunIdentity) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    write_log(&paths.logs_dir, "mainnet.log", MAINNET_LOG);

    let result = parse_deployments(&paths.infra_store(), &identity, &paths).await;

    assert_matches!(result, Err(TrackerError::MissingSnapshot(key)) if key == "deploy-contracts-42-deploy");
    assert!(paths.logs_dir.join("mainnet.log").exists());
    assert!(!paths.output_dir.exists());
}

#[rstest]
#[tokio::test]
async fn no_deployments_skips_artifact(identity: RunIdentity, environments: Vec<NetworkEnvironment>) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let store = paths.infra_store();
    record_infrastructure(&store, &identity, environments).await.unwrap();

    // Chain 137 belongs to no recorded environment.
    write_log(&paths.logs_dir, "polygon.log", "##\nStart verifying contract `0x01` deployed on 137\n");

    let outcome = parse_deployments(&store, &identity, &paths).await.unwrap();
    assert!(outcome.report.is_empty());
    assert_eq!(outcome.written_to, None);
    assert!(!artifact_path(&paths.output_dir, "deploy-contracts-42-deploy").exists());
    assert!(!paths.logs_dir.exists());
}

#[rstest]
#[tokio::test]
async fn runs_do_not_see_each_other(identity: RunIdentity) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let store = paths.infra_store();
    record_infrastructure(&store, &identity, vec![environment("1", 1)]).await.unwrap();

    let other = RunIdentity { run_number: 43, ..identity.clone() };
    assert_eq!(store.read(&other.storage_key()).await.unwrap(), None);

    store.delete(&identity.storage_key()).await.unwrap();
    assert_eq!(store.read(&identity.storage_key()).await.unwrap(), None);
}

#[rstest]
#[tokio::test]
async fn record_infra_keeps_provisioning_order(identity: RunIdentity) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let networks_file = workspace.path().join("networks.json");
    let provisioned = vec![environment("mainnet", 1), environment("base", 8453)];
    std::fs::write(&networks_file, serde_json::to_string(&provisioned).unwrap()).unwrap();

    record_infra(&paths.infra_store(), &identity, &networks_file).await.unwrap().unwrap();

    let stored = paths.infra_store().read(&identity.storage_key()).await.unwrap().unwrap();
    let order: Vec<_> = stored.environments().map(|environment| environment.network_id.as_str()).collect();
    assert_eq!(order, vec!["mainnet", "base"]);
}

#[rstest]
#[tokio::test]
async fn record_infra_rejects_malformed_file(identity: RunIdentity) {
    let workspace = TempDir::new().unwrap();
    let paths = TrackerPaths::new(workspace.path());
    let networks_file = workspace.path().join("networks.json");
    std::fs::write(&networks_file, "{ \"not\": \"an array\" }").unwrap();

    let result = record_infra(&paths.infra_store(), &identity, &networks_file).await;
    assert_matches!(result, Err(TrackerError::Json(_)));
    assert_eq!(paths.infra_store().read(&identity.storage_key()).await.unwrap(), None);
}
