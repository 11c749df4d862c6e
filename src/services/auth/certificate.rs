//! Identity from a verified TLS client certificate chain.

use rustls::pki_types::CertificateDer;
use thiserror::Error;
use x509_parser::parse_x509_certificate;

/// Client certificate chain of the connection a request arrived on.
///
/// Inserted into request extensions by the TLS acceptor only after rustls verified
/// the chain against the configured client CA. The leaf certificate comes first.
/// Plain HTTP requests carry no `ClientCertChain` at all.
#[derive(Clone, Debug, Default)]
pub struct ClientCertChain {
    pub certificates: Vec<CertificateDer<'static>>,
}

impl ClientCertChain {
    pub fn new(certificates: Vec<CertificateDer<'static>>) -> Self {
        Self { certificates }
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn leaf(&self) -> Option<&CertificateDer<'static>> {
        self.certificates.first()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CertificateError {
    #[error("empty certificate chain")]
    EmptyChain,
    #[error("leaf certificate is not valid DER: {0}")]
    Malformed(String),
    #[error("leaf certificate subject has no common name")]
    MissingCommonName,
}

/// Subject common name of the chain's leaf certificate.
pub fn leaf_common_name(chain: &ClientCertChain) -> Result<String, CertificateError> {
    let leaf = chain.leaf().ok_or(CertificateError::EmptyChain)?;
    let (_, cert) = parse_x509_certificate(leaf.as_ref())
        .map_err(|e| CertificateError::Malformed(e.to_string()))?;

    let cn = cert
        .subject()
        .iter_common_name()
        .next()
        .ok_or(CertificateError::MissingCommonName)?;

    cn.as_str()
        .map(str::to_string)
        .map_err(|_| CertificateError::MissingCommonName)
}
