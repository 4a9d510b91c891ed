//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use fabric_rest_gateway::config::GatewayConfig;
use fabric_rest_gateway::ledger::{Gateway, LedgerError, LedgerResult, TransactionSubmitter};
use fabric_rest_gateway::HttpServer;

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub channel: String,
    pub chaincode: String,
    /// Transaction name followed by its positional arguments.
    pub invocation: Vec<String>,
}

/// Programmed outcome for the mock submitter.
enum Outcome {
    Success(Vec<u8>),
    Reject(String),
    Timeout(u64),
}

/// A submitter that records every call and returns a programmed outcome.
pub struct MockSubmitter {
    calls: Mutex<Vec<Call>>,
    outcome: Outcome,
}

impl MockSubmitter {
    pub fn succeeding(payload: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Outcome::Success(payload.to_vec()),
        })
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Outcome::Reject(message.to_string()),
        })
    }

    #[allow(dead_code)]
    pub fn timing_out(secs: u64) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Outcome::Timeout(secs),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(
        &self,
        channel: &str,
        chaincode: &str,
        transaction: &str,
        args: &[String],
    ) -> LedgerResult<Vec<u8>> {
        let mut invocation = vec![transaction.to_string()];
        invocation.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(Call {
            channel: channel.to_string(),
            chaincode: chaincode.to_string(),
            invocation,
        });

        match &self.outcome {
            Outcome::Success(payload) => Ok(payload.clone()),
            Outcome::Reject(message) => Err(LedgerError::Submit(message.clone())),
            Outcome::Timeout(secs) => Err(LedgerError::Timeout(*secs)),
        }
    }
}

/// Start a gateway server on an ephemeral port, wired to the given submitter.
pub async fn start_gateway(submitter: Arc<dyn TransactionSubmitter>) -> SocketAddr {
    let contract = Gateway::with_submitter(submitter)
        .network("mychannel")
        .contract("mycontract");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&GatewayConfig::default(), contract);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}
