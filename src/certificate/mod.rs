use reqwest::ClientBuilder;

use crate::{Error, Result};


/// TLS client identity and handler settings presented by the transport.
///
/// Material is kept as PEM and turned into transport objects each time a
/// client is built, so one handle can back any number of transports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Certificate {
    identity: Option<Vec<u8>>,
    root_certificates: Vec<Vec<u8>>,
    accept_invalid_certs: bool,
}

impl Certificate {
    pub fn new() -> Certificate {
        Certificate::default()
    }

    /// Client identity from a PEM buffer holding a private key and its certificate chain.
    pub fn from_identity_pem(pem: &[u8]) -> Result<Certificate> {
        reqwest::Identity::from_pem(pem).map_err(|e| Error::InvalidCertificate(e.to_string()))?;
        Ok(Certificate {
            identity: Some(pem.to_vec()),
            ..Certificate::default()
        })
    }

    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    /// Trusts an additional root certificate, PEM encoded.
    pub fn insert_root_certificate(&mut self, pem: &[u8]) -> Result<()> {
        reqwest::Certificate::from_pem(pem).map_err(|e| Error::InvalidCertificate(e.to_string()))?;
        self.root_certificates.push(pem.to_vec());
        Ok(())
    }

    pub fn remove_root_certificate(&mut self, index: usize) -> Option<Vec<u8>> {
        if index < self.root_certificates.len() {
            Some(self.root_certificates.remove(index))
        } else {
            None
        }
    }

    pub fn root_certificates(&self) -> &[Vec<u8>] {
        &self.root_certificates
    }

    pub fn set_accept_invalid_certs(&mut self, accept: bool) {
        self.accept_invalid_certs = accept;
    }

    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub(crate) fn configure(&self, mut builder: ClientBuilder) -> Result<ClientBuilder> {
        if let Some(pem) = &self.identity {
            let identity = reqwest::Identity::from_pem(pem).map_err(Error::Transport)?;
            builder = builder.identity(identity);
        }
        for pem in &self.root_certificates {
            let root = reqwest::Certificate::from_pem(pem).map_err(Error::Transport)?;
            builder = builder.add_root_certificate(root);
        }
        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder)
    }
}
