//! Gateway session: connection handle, channel and contract resolution.
//!
//! The session is created once at startup and shared read-only by every
//! request afterwards. A partially-initialized gateway must never serve
//! traffic, so every step here is fatal on failure and nothing retries.

use std::sync::Arc;
use std::time::Duration;

use crate::ledger::profile::ConnectionProfile;
use crate::ledger::transport::GrpcSubmitter;
use crate::ledger::types::{FabricConfig, LedgerResult};
use crate::ledger::wallet::Wallet;

/// The narrow contract this process requires from the ledger network:
/// submit one named transaction with ordered string arguments, get back a
/// payload or an error. Everything above this seam is transport-agnostic;
/// tests substitute their own implementations.
#[async_trait::async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        channel: &str,
        chaincode: &str,
        transaction: &str,
        args: &[String],
    ) -> LedgerResult<Vec<u8>>;
}

/// Options for connecting a gateway.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Wallet label of the identity to act as.
    pub identity: String,
    /// Enable service discovery on the network.
    pub discovery: bool,
    /// Rewrite discovered/declared hosts to localhost (dockerized networks).
    pub as_localhost: bool,
    /// Deadline applied to dialing and to each submission.
    pub timeout: Duration,
}

/// Live connection to the ledger network.
///
/// Owns the transport; handed out `Network` and `Contract` handles share it.
#[derive(Clone)]
pub struct Gateway {
    submitter: Arc<dyn TransactionSubmitter>,
}

impl Gateway {
    /// Connect to the network described by the profile, acting as the given
    /// wallet identity.
    ///
    /// Performs, in order: identity lookup, peer resolution, endpoint dial.
    /// Any failure is returned to the caller; the process must not serve
    /// traffic after a failed connect.
    pub async fn connect(
        profile: &ConnectionProfile,
        wallet: &Wallet,
        options: ConnectOptions,
    ) -> LedgerResult<Self> {
        let identity = wallet.get(&options.identity)?;
        let (peer_name, peer) = profile.client_peer()?;

        let submitter = GrpcSubmitter::connect(peer, identity, &options).await?;

        tracing::info!(
            peer = %peer_name,
            identity = %options.identity,
            discovery = options.discovery,
            "Gateway connected"
        );

        Ok(Self {
            submitter: Arc::new(submitter),
        })
    }

    /// Build a gateway around an existing submitter. Used by tests to inject
    /// mock transports through the same seam production code uses.
    pub fn with_submitter(submitter: Arc<dyn TransactionSubmitter>) -> Self {
        Self { submitter }
    }

    /// Resolve a channel binding by name. Infallible; the network rejects an
    /// unknown channel at first submission, not here.
    pub fn network(&self, channel: &str) -> Network {
        Network {
            channel: channel.to_string(),
            submitter: self.submitter.clone(),
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}

/// A channel binding obtained from a gateway.
#[derive(Clone)]
pub struct Network {
    channel: String,
    submitter: Arc<dyn TransactionSubmitter>,
}

impl Network {
    /// Resolve a deployed contract by chaincode name.
    pub fn contract(&self, name: &str) -> Contract {
        Contract {
            channel: self.channel.clone(),
            name: name.to_string(),
            submitter: self.submitter.clone(),
        }
    }

    /// Name of the bound channel.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

/// Handle to one deployed contract on one channel.
#[derive(Clone)]
pub struct Contract {
    channel: String,
    name: String,
    submitter: Arc<dyn TransactionSubmitter>,
}

impl Contract {
    /// Submit a named transaction with positional string arguments.
    ///
    /// One awaited call per invocation; concurrent callers submit
    /// independently and unordered. The return payload is the chaincode's.
    pub async fn submit_transaction(
        &self,
        transaction: &str,
        args: &[String],
    ) -> LedgerResult<Vec<u8>> {
        self.submitter
            .submit(&self.channel, &self.name, transaction, args)
            .await
    }

    /// Chaincode name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel this handle is bound to.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("channel", &self.channel)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Initialize the full gateway session from configuration.
///
/// Runs the boot sequence of wallet open, profile load, gateway connect,
/// channel and contract resolution. Called exactly once, before the HTTP
/// listener binds.
pub async fn initialize(config: &FabricConfig) -> LedgerResult<Contract> {
    let wallet = Wallet::open(&config.wallet_path)?;
    let profile = ConnectionProfile::load(&config.connection_profile)?;

    let options = ConnectOptions {
        identity: config.identity.clone(),
        discovery: config.discovery,
        as_localhost: config.as_localhost,
        timeout: Duration::from_secs(config.rpc_timeout_secs),
    };

    let gateway = Gateway::connect(&profile, &wallet, options).await?;
    let contract = gateway.network(&config.channel).contract(&config.chaincode);

    tracing::info!(
        channel = %contract.channel(),
        chaincode = %contract.name(),
        "Contract resolved"
    );

    Ok(contract)
}
