use std::path::Path;

use rstest::fixture;

use crate::types::{NetworkEnvironment, RunIdentity};

pub const MAINNET_LOG: &str = "\
Compiling 24 files with Solc 0.8.23
##
Start verifying contract `0x5FbDB2315678afecb367f032d93F642f64180aa3` deployed on 1
Compiler version: 0.8.23
Optimizations: 200
Submitting verification for [src/Token.sol:Token] 0x5FbDB2315678afecb367f032d93F642f64180aa3.
Contract verification status:
Response: `OK`
Start verifying contract `0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512` deployed on 1
Compiler version: 0.8.23
Submitting verification for [src/Vault.sol:Vault] 0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512.
Contract verification status:
Response: `NOTOK`
";

pub const BASE_LOG: &str = "\
##
Start verifying contract `0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9` deployed on 8453
Compiler version: 0.8.20
Submitting verification for [src/Bridge.sol:Bridge] 0xCf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9.
";

#[fixture]
pub fn identity() -> RunIdentity {
    RunIdentity { workflow: "Deploy Contracts".into(), run_id: 9_001_234, run_number: 42, job: "deploy".into() }
}

pub fn environment(network_id: &str, chain_id: u64) -> NetworkEnvironment {
    NetworkEnvironment {
        id: format!("vnet-{network_id}"),
        admin_rpc_url: format!("https://virtual.rpc.example/admin/{network_id}"),
        public_rpc_url: format!("https://virtual.rpc.example/public/{network_id}"),
        network_id: network_id.to_string(),
        chain_id,
        testnet_slug: format!("deploy-contracts-42-{network_id}"),
        explorer_url: None,
    }
}

#[fixture]
pub fn environments() -> Vec<NetworkEnvironment> {
    vec![environment("1", 1), environment("8453", 8453), environment("10", 10)]
}

pub fn write_log(dir: &Path, name: &str, content: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}
