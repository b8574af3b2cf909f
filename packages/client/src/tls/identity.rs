//! Builds a rustls client configuration from `TlsClientOptions`

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustls::crypto::ring;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore, SignatureAlgorithm, SupportedProtocolVersion};

use super::verifier::NoVerification;
use super::{TlsClientOptions, TlsError, TlsVersion};

/// A ready-to-use client TLS configuration.
#[derive(Debug, Clone)]
pub struct TlsClientConfig {
    pub client_config: Arc<ClientConfig>,
    /// Name verified against the server certificate instead of the URL host.
    pub server_name: Option<ServerName<'static>>,
    /// Whether certificate verification ended up disabled.
    pub insecure_skip_verify: bool,
}

type Identity = (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>);

/// Build the TLS configuration described by `opts`.
///
/// # Errors
///
/// - `CertLoad` when the certificate or key cannot be read or parsed, or the
///   two do not match
/// - `UnsupportedKeyType` when a loaded key is neither RSA nor ECDSA
/// - `CaFile` when the CA bundle cannot be read
pub fn tls_client_auth(opts: &TlsClientOptions) -> Result<TlsClientConfig, TlsError> {
    let identity = load_identity(opts)?;

    let server_name = opts
        .server_name()
        .map(|name| {
            ServerName::try_from(name.to_owned())
                .map_err(|_| TlsError::InvalidServerName(name.to_owned()))
        })
        .transpose()?;
    let insecure_skip_verify = opts.insecure_skip_verify && server_name.is_none();
    let roots = root_store(opts)?;

    let provider = Arc::new(ring::default_provider());
    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(protocol_versions(opts.min_version))
        .map_err(|e| TlsError::Config(e.to_string()))?;

    let builder = if insecure_skip_verify {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoVerification::new(provider)))
    } else {
        builder.with_root_certificates(roots)
    };

    let client_config = match identity {
        Some((certs, key)) => builder
            .with_client_auth_cert(certs, key)
            .map_err(|e| TlsError::CertLoad(e.to_string()))?,
        None => builder.with_no_client_auth(),
    };

    Ok(TlsClientConfig {
        client_config: Arc::new(client_config),
        server_name,
        insecure_skip_verify,
    })
}

fn protocol_versions(min: Option<TlsVersion>) -> &'static [&'static SupportedProtocolVersion] {
    static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];
    match min {
        Some(TlsVersion::Tls13) => TLS13_ONLY,
        _ => rustls::ALL_VERSIONS,
    }
}

fn load_identity(opts: &TlsClientOptions) -> Result<Option<Identity>, TlsError> {
    if let Some(cert_path) = opts.certificate_path() {
        let key_path = opts
            .key
            .as_deref()
            .ok_or_else(|| TlsError::CertLoad("certificate given without a key".into()))?;
        return load_key_pair_files(cert_path, key_path).map(Some);
    }

    match (&opts.loaded_certificate, &opts.loaded_key) {
        (Some(cert), Some(key)) => reencode_key_pair(cert, key).map(Some),
        (Some(_), None) => Err(TlsError::CertLoad(
            "loaded certificate given without a key".into(),
        )),
        _ => Ok(None),
    }
}

fn load_key_pair_files(cert_path: &Path, key_path: &Path) -> Result<Identity, TlsError> {
    let cert_pem = fs::read(cert_path)
        .map_err(|e| TlsError::CertLoad(format!("{}: {e}", cert_path.display())))?;
    let key_pem = fs::read(key_path)
        .map_err(|e| TlsError::CertLoad(format!("{}: {e}", key_path.display())))?;
    parse_key_pair(&cert_pem, &key_pem)
}

/// Round-trip loaded material through PEM so it is validated exactly like a
/// key pair read from disk.
fn reencode_key_pair(
    cert: &CertificateDer<'static>,
    key: &PrivateKeyDer<'static>,
) -> Result<Identity, TlsError> {
    let signing_key = ring::sign::any_supported_type(key)
        .map_err(|e| TlsError::CertLoad(e.to_string()))?;
    match signing_key.algorithm() {
        SignatureAlgorithm::RSA | SignatureAlgorithm::ECDSA => {}
        other => return Err(TlsError::UnsupportedKeyType(format!("{other:?}"))),
    }

    let tag = match key {
        PrivateKeyDer::Pkcs1(_) => "RSA PRIVATE KEY",
        PrivateKeyDer::Sec1(_) => "EC PRIVATE KEY",
        PrivateKeyDer::Pkcs8(_) => "PRIVATE KEY",
        _ => return Err(TlsError::UnsupportedKeyType("unknown key encoding".into())),
    };

    let key_pem = pem::encode(&pem::Pem::new(tag, key.secret_der().to_vec()));
    let cert_pem = pem::encode(&pem::Pem::new("CERTIFICATE", cert.as_ref().to_vec()));
    parse_key_pair(cert_pem.as_bytes(), key_pem.as_bytes())
}

fn parse_key_pair(cert_pem: &[u8], key_pem: &[u8]) -> Result<Identity, TlsError> {
    let certs = rustls_pemfile::certs(&mut &*cert_pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::CertLoad(e.to_string()))?;
    if certs.is_empty() {
        return Err(TlsError::CertLoad("no certificate found in PEM data".into()));
    }

    let key = rustls_pemfile::private_key(&mut &*key_pem)
        .map_err(|e| TlsError::CertLoad(e.to_string()))?
        .ok_or_else(|| TlsError::CertLoad("no private key found in PEM data".into()))?;

    let signing_key = ring::sign::any_supported_type(&key)
        .map_err(|e| TlsError::CertLoad(e.to_string()))?;
    let certified = rustls::sign::CertifiedKey::new(certs.clone(), signing_key);
    match certified.keys_match() {
        // provider cannot expose the public key
        Ok(()) | Err(rustls::Error::InconsistentKeys(rustls::InconsistentKeys::Unknown)) => {}
        Err(e) => return Err(TlsError::CertLoad(e.to_string())),
    }

    Ok((certs, key))
}

fn root_store(opts: &TlsClientOptions) -> Result<RootCertStore, TlsError> {
    let mut roots = RootCertStore::empty();

    if let Some(ca) = &opts.loaded_ca {
        roots
            .add(ca.clone())
            .map_err(|e| TlsError::InvalidCa(e.to_string()))?;
        return Ok(roots);
    }

    if let Some(path) = opts.ca_path() {
        let pem = fs::read(path).map_err(|source| TlsError::CaFile {
            path: path.clone(),
            source,
        })?;
        let mut reader = pem.as_slice();
        let certs = rustls_pemfile::certs(&mut reader).filter_map(Result::ok);
        let (added, ignored) = roots.add_parsable_certificates(certs);
        tracing::debug!("loaded {added} CA certificates from {} ({ignored} ignored)", path.display());
        return Ok(roots);
    }

    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        tracing::warn!("certificate load error: {err}");
    }
    let (added, _) = roots.add_parsable_certificates(native.certs);
    if added == 0 || !native.errors.is_empty() {
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    tracing::debug!("using {} platform trust roots", roots.len());
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rcgen::{CertificateParams, KeyPair, PKCS_ED25519};
    use rustls::pki_types::PrivatePkcs8KeyDer;

    use super::*;

    fn self_signed(key_pair: &KeyPair) -> CertificateDer<'static> {
        let params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        params.self_signed(key_pair).unwrap().der().clone()
    }

    fn pkcs8(key_pair: &KeyPair) -> PrivateKeyDer<'static> {
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()))
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("oasrt-{}-{name}", fastrand::u64(..)));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_files_fail_with_cert_load() {
        let opts = TlsClientOptions::new().with_certificate_files("bad/path", "bad/path");
        assert!(matches!(tls_client_auth(&opts), Err(TlsError::CertLoad(_))));
    }

    #[test]
    fn loaded_ecdsa_identity_survives_pem_round_trip() {
        let key_pair = KeyPair::generate().unwrap();
        let opts = TlsClientOptions::new()
            .with_loaded_certificate(self_signed(&key_pair), pkcs8(&key_pair));

        let config = tls_client_auth(&opts).unwrap();
        assert!(config.client_config.client_auth_cert_resolver.has_certs());
    }

    #[test]
    fn ed25519_keys_are_rejected() {
        let key_pair = KeyPair::generate_for(&PKCS_ED25519).unwrap();
        let opts = TlsClientOptions::new()
            .with_loaded_certificate(self_signed(&key_pair), pkcs8(&key_pair));

        assert!(matches!(
            tls_client_auth(&opts),
            Err(TlsError::UnsupportedKeyType(_))
        ));
    }

    #[test]
    fn mismatched_key_fails_with_cert_load() {
        let cert_key = KeyPair::generate().unwrap();
        let other_key = KeyPair::generate().unwrap();
        let opts = TlsClientOptions::new()
            .with_loaded_certificate(self_signed(&cert_key), pkcs8(&other_key));

        assert!(matches!(tls_client_auth(&opts), Err(TlsError::CertLoad(_))));
    }

    #[test]
    fn certificate_files_are_loaded() {
        let key_pair = KeyPair::generate().unwrap();
        let cert = CertificateParams::new(vec!["localhost".to_string()])
            .unwrap()
            .self_signed(&key_pair)
            .unwrap();
        let cert_path = temp_file("cert.pem", &cert.pem());
        let key_path = temp_file("key.pem", &key_pair.serialize_pem());

        let opts = TlsClientOptions::new().with_certificate_files(&cert_path, &key_path);
        let config = tls_client_auth(&opts);
        let _ = fs::remove_file(&cert_path);
        let _ = fs::remove_file(&key_path);

        assert!(config.unwrap().client_config.client_auth_cert_resolver.has_certs());
    }

    #[test]
    fn certificate_path_wins_over_loaded_certificate() {
        let key_pair = KeyPair::generate().unwrap();
        let opts = TlsClientOptions::new()
            .with_loaded_certificate(self_signed(&key_pair), pkcs8(&key_pair))
            .with_certificate_files("bad/path", "bad/path");

        assert!(matches!(tls_client_auth(&opts), Err(TlsError::CertLoad(_))));
    }

    #[test]
    fn unreadable_ca_file_fails() {
        let opts = TlsClientOptions::new().with_ca_file("bad/ca.pem");
        assert!(matches!(tls_client_auth(&opts), Err(TlsError::CaFile { .. })));
    }

    #[test]
    fn ca_file_is_loaded() {
        let key_pair = KeyPair::generate().unwrap();
        let ca = CertificateParams::new(vec!["ca.local".to_string()])
            .unwrap()
            .self_signed(&key_pair)
            .unwrap();
        let ca_path = temp_file("ca.pem", &ca.pem());

        let opts = TlsClientOptions::new().with_ca_file(&ca_path);
        let config = tls_client_auth(&opts);
        let _ = fs::remove_file(&ca_path);

        assert!(config.is_ok());
    }

    #[test]
    fn unreadable_ca_file_fails_even_when_skipping_verification() {
        let opts = TlsClientOptions::new()
            .with_insecure_skip_verify(true)
            .with_ca_file("bad/ca.pem");
        assert!(matches!(tls_client_auth(&opts), Err(TlsError::CaFile { .. })));
    }

    #[test]
    fn loaded_ca_is_accepted() {
        let key_pair = KeyPair::generate().unwrap();
        let opts = TlsClientOptions::new().with_loaded_ca(self_signed(&key_pair));
        assert!(tls_client_auth(&opts).is_ok());
    }

    #[test]
    fn server_name_always_forces_verification() {
        for skip in [false, true] {
            let opts = TlsClientOptions::new()
                .with_insecure_skip_verify(skip)
                .with_server_name("api.example.com");
            let config = tls_client_auth(&opts).unwrap();
            assert!(!config.insecure_skip_verify);
            assert!(config.server_name.is_some());
        }
    }

    #[test]
    fn skip_verify_without_server_name_is_kept() {
        let opts = TlsClientOptions::new().with_insecure_skip_verify(true);
        assert!(tls_client_auth(&opts).unwrap().insecure_skip_verify);
    }

    #[test]
    fn tls13_minimum_limits_versions() {
        let opts = TlsClientOptions::new().with_min_version(TlsVersion::Tls13);
        assert!(tls_client_auth(&opts).is_ok());
        assert_eq!(protocol_versions(Some(TlsVersion::Tls13)).len(), 1);
        assert_eq!(protocol_versions(Some(TlsVersion::Tls10)).len(), 2);
    }
}
