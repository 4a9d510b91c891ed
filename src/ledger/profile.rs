//! Connection profile parsing.
//!
//! The connection profile is the static JSON document describing the network
//! topology (peers, orderers, certificate authorities) this process needs in
//! order to reach the ledger. It is read once at startup and never reloaded.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::ledger::types::{LedgerError, LedgerResult};

/// Parsed connection profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionProfile {
    /// Profile name, informational only.
    #[serde(default)]
    pub name: String,
    /// Client section naming the organization this process acts as.
    pub client: ClientSection,
    /// Organizations keyed by name.
    #[serde(default)]
    pub organizations: BTreeMap<String, Organization>,
    /// Peers keyed by name.
    #[serde(default)]
    pub peers: BTreeMap<String, PeerEndpoint>,
    /// Orderers keyed by name. Unused by the submit path but part of the
    /// topology description.
    #[serde(default)]
    pub orderers: BTreeMap<String, PeerEndpoint>,
    /// Certificate authorities keyed by name.
    #[serde(default, rename = "certificateAuthorities")]
    pub certificate_authorities: BTreeMap<String, CertificateAuthority>,
}

/// `client` section of the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    /// Name of the organization this client belongs to.
    pub organization: String,
}

/// One organization entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    /// MSP id of the organization.
    #[serde(default)]
    pub mspid: String,
    /// Peer names belonging to this organization, in preference order.
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default, rename = "certificateAuthorities")]
    pub certificate_authorities: Vec<String>,
}

/// A network endpoint (peer or orderer) with its transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerEndpoint {
    /// gRPC URL, e.g. `grpcs://localhost:7051`.
    pub url: String,
    /// TLS CA material for verifying the endpoint.
    #[serde(default, rename = "tlsCACerts")]
    pub tls_ca_certs: Option<TlsCaCerts>,
    /// Channel options; only the TLS name override is honored here.
    #[serde(default, rename = "grpcOptions")]
    pub grpc_options: GrpcOptions,
}

/// Inline TLS CA certificate.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsCaCerts {
    /// PEM-encoded CA certificate.
    #[serde(default)]
    pub pem: Option<String>,
}

/// Subset of per-endpoint gRPC options this client honors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrpcOptions {
    /// Expected TLS server name when it differs from the URL host.
    #[serde(default, rename = "ssl-target-name-override")]
    pub ssl_target_name_override: Option<String>,
}

/// A certificate authority entry. Enrollment is out of scope; the entry is
/// carried so the profile round-trips intact.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateAuthority {
    pub url: String,
    #[serde(default, rename = "caName")]
    pub ca_name: Option<String>,
}

impl ConnectionProfile {
    /// Load and parse a connection profile from disk.
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Profile(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let profile: ConnectionProfile = serde_json::from_str(&content).map_err(|e| {
            LedgerError::Profile(format!("Malformed profile '{}': {}", path.display(), e))
        })?;

        tracing::info!(
            profile = %profile.name,
            organization = %profile.client.organization,
            peers = profile.peers.len(),
            "Connection profile loaded"
        );

        Ok(profile)
    }

    /// Resolve the first peer of the client's organization.
    ///
    /// This is the endpoint the gateway dials; with discovery enabled the
    /// network fans out from there.
    pub fn client_peer(&self) -> LedgerResult<(&str, &PeerEndpoint)> {
        let org_name = &self.client.organization;
        let org = self.organizations.get(org_name).ok_or_else(|| {
            LedgerError::Profile(format!("Client organization '{}' not defined", org_name))
        })?;
        let peer_name = org.peers.first().ok_or_else(|| {
            LedgerError::Profile(format!("Organization '{}' lists no peers", org_name))
        })?;
        let peer = self.peers.get(peer_name).ok_or_else(|| {
            LedgerError::Profile(format!("Peer '{}' not defined in profile", peer_name))
        })?;

        // Catch obviously broken endpoints before dialing.
        url::Url::parse(&peer.url)
            .map_err(|e| LedgerError::Profile(format!("Invalid peer URL '{}': {}", peer.url, e)))?;

        Ok((peer_name.as_str(), peer))
    }

    /// MSP id of the client's organization, if declared.
    pub fn client_msp_id(&self) -> Option<&str> {
        self.organizations
            .get(&self.client.organization)
            .map(|org| org.mspid.as_str())
    }
}
