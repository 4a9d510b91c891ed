//! gRPC transport for transaction submission.
//!
//! # Responsibilities
//! - Dial the peer's gateway endpoint (TLS per the connection profile)
//! - Build, sign, and submit transaction proposals
//! - Enforce the configured submission timeout
//!
//! The wire format is a hand-maintained prost mapping of the Fabric Gateway
//! submit flow, reduced to the single unary call this process performs. The
//! gateway peer orchestrates endorsement and ordering server-side; the client
//! only identifies itself and signs.

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::timeout;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;

use crate::ledger::gateway::{ConnectOptions, TransactionSubmitter};
use crate::ledger::profile::PeerEndpoint;
use crate::ledger::types::{LedgerError, LedgerResult};
use crate::ledger::wallet::Identity;

/// Full method path of the gateway submit call.
const SUBMIT_METHOD: &str = "/gateway.Gateway/Submit";

/// Nonce length in bytes, matching the Fabric client SDKs.
const NONCE_LEN: usize = 24;

/// Serialized client identity attached to every proposal.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SerializedIdentity {
    #[prost(string, tag = "1")]
    pub mspid: String,
    #[prost(bytes = "vec", tag = "2")]
    pub id_bytes: Vec<u8>,
}

/// Transaction proposal body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Proposal {
    #[prost(string, tag = "1")]
    pub channel_id: String,
    #[prost(string, tag = "2")]
    pub chaincode_id: String,
    #[prost(string, tag = "3")]
    pub transaction_name: String,
    #[prost(string, repeated, tag = "4")]
    pub args: Vec<String>,
    #[prost(bytes = "vec", tag = "5")]
    pub creator: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub nonce: Vec<u8>,
}

/// Proposal bytes plus the client signature over them.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedProposal {
    #[prost(bytes = "vec", tag = "1")]
    pub proposal_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

/// Unary submit request.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubmitRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(string, tag = "2")]
    pub channel_id: String,
    #[prost(message, optional, tag = "3")]
    pub proposed_transaction: Option<SignedProposal>,
}

/// Unary submit response. The payload is whatever the chaincode returned.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubmitResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub payload: Vec<u8>,
}

/// Signing material resolved from a wallet identity.
pub struct SigningIdentity {
    msp_id: String,
    certificate: String,
    key: SigningKey,
}

impl SigningIdentity {
    /// Build signing material from a wallet identity.
    pub fn from_identity(identity: &Identity) -> LedgerResult<Self> {
        let key = signing_key_from_pem(&identity.credentials.private_key)?;
        Ok(Self {
            msp_id: identity.msp_id.clone(),
            certificate: identity.credentials.certificate.clone(),
            key,
        })
    }

    /// Prost-encoded identity bytes for the proposal's creator field.
    pub fn creator(&self) -> Vec<u8> {
        SerializedIdentity {
            mspid: self.msp_id.clone(),
            id_bytes: self.certificate.clone().into_bytes(),
        }
        .encode_to_vec()
    }

    /// Sign proposal bytes: ECDSA P-256 over SHA-256, low-S, DER-encoded.
    pub fn sign(&self, message: &[u8]) -> LedgerResult<Vec<u8>> {
        let signature: Signature = self
            .key
            .try_sign(message)
            .map_err(|e| LedgerError::Wallet(format!("Signing failed: {}", e)))?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

// Manual Debug so key material never leaks through logging.
impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("msp_id", &self.msp_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Parse a PEM private key, accepting both PKCS#8 and SEC1 encodings.
fn signing_key_from_pem(pem: &str) -> LedgerResult<SigningKey> {
    if let Ok(secret) = SecretKey::from_pkcs8_pem(pem) {
        return Ok(SigningKey::from(secret));
    }
    SecretKey::from_sec1_pem(pem)
        .map(SigningKey::from)
        .map_err(|e| LedgerError::Wallet(format!("Unsupported private key: {}", e)))
}

/// Production [`TransactionSubmitter`] speaking gRPC to one gateway peer.
#[derive(Debug)]
pub struct GrpcSubmitter {
    grpc: Grpc<Channel>,
    identity: SigningIdentity,
    timeout_duration: Duration,
}

impl GrpcSubmitter {
    /// Dial the peer endpoint and return a ready submitter.
    ///
    /// A single failed dial is fatal to the caller; no retry is attempted.
    pub async fn connect(
        peer: &PeerEndpoint,
        identity: &Identity,
        options: &ConnectOptions,
    ) -> LedgerResult<Self> {
        let identity = SigningIdentity::from_identity(identity)?;
        let address = endpoint_url(&peer.url, options.as_localhost)?;

        let mut endpoint = Endpoint::from_shared(address.clone())
            .map_err(|e| LedgerError::Connect(format!("Invalid endpoint '{}': {}", address, e)))?
            .connect_timeout(options.timeout);

        if let Some(pem) = peer.tls_ca_certs.as_ref().and_then(|certs| certs.pem.as_deref()) {
            let mut tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem));
            if let Some(name) = peer.grpc_options.ssl_target_name_override.as_deref() {
                tls = tls.domain_name(name);
            }
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| LedgerError::Connect(format!("TLS setup failed: {}", e)))?;
        }

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| LedgerError::Connect(format!("Cannot reach '{}': {}", address, e)))?;

        tracing::info!(
            endpoint = %address,
            msp_id = %identity.msp_id,
            "Gateway endpoint connected"
        );

        Ok(Self {
            grpc: Grpc::new(channel),
            identity,
            timeout_duration: options.timeout,
        })
    }

    fn build_request(
        &self,
        channel: &str,
        chaincode: &str,
        transaction: &str,
        args: &[String],
    ) -> LedgerResult<SubmitRequest> {
        let creator = self.identity.creator();
        let mut nonce = vec![0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let transaction_id = transaction_id(&nonce, &creator);

        let proposal = Proposal {
            channel_id: channel.to_string(),
            chaincode_id: chaincode.to_string(),
            transaction_name: transaction.to_string(),
            args: args.to_vec(),
            creator,
            nonce,
        };
        let proposal_bytes = proposal.encode_to_vec();
        let signature = self.identity.sign(&proposal_bytes)?;

        Ok(SubmitRequest {
            transaction_id,
            channel_id: channel.to_string(),
            proposed_transaction: Some(SignedProposal {
                proposal_bytes,
                signature,
            }),
        })
    }
}

#[async_trait::async_trait]
impl TransactionSubmitter for GrpcSubmitter {
    async fn submit(
        &self,
        channel: &str,
        chaincode: &str,
        transaction: &str,
        args: &[String],
    ) -> LedgerResult<Vec<u8>> {
        let request = self.build_request(channel, chaincode, transaction, args)?;
        let transaction_id = request.transaction_id.clone();
        let mut grpc = self.grpc.clone();

        let call = async move {
            grpc.ready()
                .await
                .map_err(|e| LedgerError::Connect(format!("Gateway not ready: {}", e)))?;
            let codec: ProstCodec<SubmitRequest, SubmitResponse> = ProstCodec::default();
            let path = PathAndQuery::from_static(SUBMIT_METHOD);
            let response = grpc
                .unary(tonic::Request::new(request), path, codec)
                .await
                .map_err(|status| LedgerError::Submit(status.message().to_string()))?;
            Ok(response.into_inner().payload)
        };

        match timeout(self.timeout_duration, call).await {
            Ok(result) => {
                if result.is_ok() {
                    tracing::debug!(
                        transaction_id = %transaction_id,
                        transaction = %transaction,
                        "Transaction committed"
                    );
                }
                result
            }
            Err(_) => Err(LedgerError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

/// Transaction id: hex SHA-256 over nonce plus creator, as the SDKs compute it.
fn transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

/// Normalize a profile URL into something tonic can dial.
///
/// `grpcs://` maps to `https://`, `grpc://` to `http://`. When `as_localhost`
/// is set the host is rewritten to localhost, mirroring the SDK option used
/// against dockerized test networks.
fn endpoint_url(peer_url: &str, as_localhost: bool) -> LedgerResult<String> {
    let parsed = url::Url::parse(peer_url)
        .map_err(|e| LedgerError::Connect(format!("Invalid peer URL '{}': {}", peer_url, e)))?;

    let scheme = match parsed.scheme() {
        "grpcs" | "https" => "https",
        "grpc" | "http" => "http",
        other => {
            return Err(LedgerError::Connect(format!(
                "Unsupported URL scheme '{}'",
                other
            )))
        }
    };

    let host = if as_localhost {
        "localhost".to_string()
    } else {
        parsed
            .host_str()
            .ok_or_else(|| LedgerError::Connect(format!("Peer URL '{}' has no host", peer_url)))?
            .to_string()
    };

    let port = parsed
        .port()
        .ok_or_else(|| LedgerError::Connect(format!("Peer URL '{}' has no port", peer_url)))?;

    Ok(format!("{}://{}:{}", scheme, host, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier;
    use p256::ecdsa::VerifyingKey;
    use p256::pkcs8::{EncodePrivateKey, LineEnding};

    fn test_identity() -> Identity {
        let secret = SecretKey::random(&mut rand::rngs::OsRng);
        let pem = secret.to_pkcs8_pem(LineEnding::LF).unwrap().to_string();
        let json = serde_json::json!({
            "credentials": {
                "certificate": "-----BEGIN CERTIFICATE-----\ntest\n-----END CERTIFICATE-----\n",
                "privateKey": pem,
            },
            "mspId": "Org1MSP",
            "type": "X.509",
            "version": 1,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_endpoint_url_normalization() {
        assert_eq!(
            endpoint_url("grpcs://peer0.org1.example.com:7051", false).unwrap(),
            "https://peer0.org1.example.com:7051"
        );
        assert_eq!(
            endpoint_url("grpc://peer0.org1.example.com:7051", false).unwrap(),
            "http://peer0.org1.example.com:7051"
        );
        assert_eq!(
            endpoint_url("grpcs://peer0.org1.example.com:7051", true).unwrap(),
            "https://localhost:7051"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_unknown_scheme() {
        let err = endpoint_url("ftp://peer:7051", false).unwrap_err();
        assert!(err.to_string().contains("Unsupported URL scheme"));

        let err = endpoint_url("grpcs://peer.example.com", false).unwrap_err();
        assert!(err.to_string().contains("no port"));
    }

    #[test]
    fn test_signing_round_trip() {
        let identity = test_identity();
        let signing = SigningIdentity::from_identity(&identity).unwrap();

        let message = b"proposal bytes";
        let der = signing.sign(message).unwrap();

        let verifying = VerifyingKey::from(&signing.key);
        let signature = Signature::from_der(&der).unwrap();
        assert!(verifying.verify(message, &signature).is_ok());
    }

    #[test]
    fn test_invalid_private_key_rejected() {
        let mut identity = test_identity();
        identity.credentials.private_key = "not a key".to_string();
        let result = SigningIdentity::from_identity(&identity);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported private key"));
    }

    #[test]
    fn test_transaction_id_is_sha256_hex() {
        let id = transaction_id(b"nonce", b"creator");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic for fixed inputs
        assert_eq!(id, transaction_id(b"nonce", b"creator"));
        assert_ne!(id, transaction_id(b"other", b"creator"));
    }

    #[test]
    fn test_creator_encodes_msp_and_certificate() {
        let identity = test_identity();
        let signing = SigningIdentity::from_identity(&identity).unwrap();
        let decoded = SerializedIdentity::decode(signing.creator().as_slice()).unwrap();
        assert_eq!(decoded.mspid, "Org1MSP");
        assert!(String::from_utf8(decoded.id_bytes)
            .unwrap()
            .contains("BEGIN CERTIFICATE"));
    }
}
