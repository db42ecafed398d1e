//! Certificate parsing and evaluation
//!
//! Turns a DER-encoded leaf certificate into a [`Certificate`] record using
//! x509-parser, and derives the expiry and key-strength warnings.

use crate::models::{Certificate, Warning};
use crate::utils::CheckError;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use x509_parser::der_parser::der::parse_der_integer;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// Days before expiry at which a certificate counts as expiring soon
pub const DEFAULT_WARNING_DAYS: i64 = 30;

const CRITICAL_DAYS: i64 = 7;
const MIN_KEY_BITS: u32 = 2048;
const SERIAL_DISPLAY_LEN: usize = 16;

const OID_COMMON_NAME: &str = "2.5.4.3";
const OID_ED25519: &str = "1.3.101.112";
const OID_ED448: &str = "1.3.101.113";

/// Evaluates leaf certificates against an expiry warning window
#[derive(Debug, Clone, Copy)]
pub struct CertificateEvaluator {
    warning_days: i64,
}

impl Default for CertificateEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_DAYS)
    }
}

impl CertificateEvaluator {
    pub fn new(warning_days: i64) -> Self {
        Self { warning_days }
    }

    /// Evaluate a certificate against the current wall clock
    pub fn evaluate(&self, der: &[u8], domain: &str) -> Result<Certificate, CheckError> {
        self.evaluate_at(der, domain, Utc::now())
    }

    /// Evaluate a certificate as of `now`
    pub fn evaluate_at(
        &self,
        der: &[u8],
        domain: &str,
        now: DateTime<Utc>,
    ) -> Result<Certificate, CheckError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| CheckError::parse(format!("failed to parse certificate: {}", e)))?;

        let issuer_attrs = name_attributes(cert.issuer());
        let subject_attrs = name_attributes(cert.subject());
        let issuer = find_attribute(&issuer_attrs, OID_COMMON_NAME)
            .unwrap_or("Unknown")
            .to_string();
        let subject = find_attribute(&subject_attrs, OID_COMMON_NAME)
            .unwrap_or(domain)
            .to_string();

        let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
        let not_after = asn1_time_to_datetime(cert.validity().not_after)?;

        let days_until_expiry = floor_days(not_after - now);
        let is_expired = now > not_after;
        let is_expiring_soon = 0 < days_until_expiry && days_until_expiry <= self.warning_days;

        Ok(Certificate {
            domain: domain.to_string(),
            is_valid: !is_expired,
            issuer,
            subject,
            not_before: not_before.naive_utc(),
            not_after: not_after.naive_utc(),
            days_until_expiry,
            is_expired,
            is_expiring_soon,
            key_size: public_key_bits(&cert)?,
            signature_algorithm: signature_algorithm_name(
                &cert.signature_algorithm.algorithm.to_id_string(),
            ),
            san_list: dns_names(&cert),
            serial_number: display_serial(cert.raw_serial()),
            fingerprint_sha256: hex::encode(Sha256::digest(der)),
        })
    }
}

/// Warnings for an evaluated certificate, at most one of them about expiry.
///
/// The expiring-soon rule reads `cert.is_expiring_soon`, so the warning
/// window is the one the certificate was evaluated with.
pub fn generate_warnings(cert: &Certificate) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let days = cert.days_until_expiry;

    if cert.is_expired {
        warnings.push(Warning::Expired {
            days_ago: days.abs(),
        });
    } else if days <= CRITICAL_DAYS {
        warnings.push(Warning::ExpiresVerySoon { days });
    } else if cert.is_expiring_soon {
        warnings.push(Warning::ExpiringSoon { days });
    }

    if cert.key_size < MIN_KEY_BITS {
        warnings.push(Warning::WeakKey {
            bits: cert.key_size,
        });
    }

    warnings
}

/// Serial as `0x` prefixed lowercase hex, cut to 16 characters.
///
/// Display only: distinct serials can render identically.
pub fn display_serial(raw: &[u8]) -> String {
    let encoded = hex::encode(raw);
    let digits = encoded.trim_start_matches('0');
    let rendered = format!("0x{}", if digits.is_empty() { "0" } else { digits });
    rendered.chars().take(SERIAL_DISPLAY_LEN).collect()
}

/// Whole days in `delta`, rounded toward negative infinity
fn floor_days(delta: Duration) -> i64 {
    let days = delta.num_days();
    if delta < Duration::zero() && delta != Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Ordered `(oid, value)` pairs of a distinguished name
fn name_attributes(name: &X509Name<'_>) -> Vec<(String, String)> {
    name.iter()
        .flat_map(|rdn| rdn.iter())
        .filter_map(|attr| {
            let value = attr.as_str().ok()?;
            Some((attr.attr_type().to_id_string(), value.to_string()))
        })
        .collect()
}

fn find_attribute<'a>(attrs: &'a [(String, String)], oid: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(attr_oid, _)| attr_oid == oid)
        .map(|(_, value)| value.as_str())
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CheckError> {
    DateTime::from_timestamp(time.timestamp(), 0)
        .ok_or_else(|| CheckError::parse("certificate validity timestamp out of range"))
}

fn public_key_bits(cert: &X509Certificate<'_>) -> Result<u32, CheckError> {
    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_id_string();

    match alg_oid.as_str() {
        OID_ED25519 => return Ok(256),
        OID_ED448 => return Ok(456),
        _ => {}
    }

    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => Ok(bit_length(rsa.modulus)),
        Ok(PublicKey::EC(_)) => {
            let curve_bits = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .and_then(|oid| ec_curve_bits(&oid.to_id_string()));
            // Uncompressed point: 0x04 || X || Y
            let point_bits = (spki.subject_public_key.data.len().saturating_sub(1) / 2 * 8) as u32;
            Ok(curve_bits.unwrap_or(point_bits))
        }
        Ok(PublicKey::DSA(y)) => Ok(dsa_prime_bits(spki).unwrap_or_else(|| bit_length(y))),
        _ => Err(CheckError::parse(format!(
            "unsupported public key algorithm: {}",
            alg_oid
        ))),
    }
}

/// Size of the prime `p` from the Dss-Parms of a DSA key
fn dsa_prime_bits(spki: &SubjectPublicKeyInfo<'_>) -> Option<u32> {
    let params = spki.algorithm.parameters.as_ref()?;
    let (_, p) = parse_der_integer(&params.data).ok()?;
    p.as_slice().ok().map(bit_length)
}

fn ec_curve_bits(curve_oid: &str) -> Option<u32> {
    match curve_oid {
        "1.2.840.10045.3.1.7" => Some(256), // P-256
        "1.3.132.0.10" => Some(256),        // secp256k1
        "1.3.132.0.34" => Some(384),        // P-384
        "1.3.132.0.35" => Some(521),        // P-521
        _ => None,
    }
}

/// Bit length of a big-endian unsigned integer
fn bit_length(be: &[u8]) -> u32 {
    match be.iter().position(|&b| b != 0) {
        Some(first) => {
            let digits = &be[first..];
            (digits.len() as u32 - 1) * 8 + (8 - digits[0].leading_zeros())
        }
        None => 0,
    }
}

/// Convert signature algorithm OID to its conventional name
fn signature_algorithm_name(oid: &str) -> String {
    let name = match oid {
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption",
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption",
        "1.2.840.113549.1.1.14" => "sha224WithRSAEncryption",
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption",
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption",
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption",
        "1.2.840.113549.1.1.10" => "RSASSA-PSS",
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1",
        "1.2.840.10045.4.3.1" => "ecdsa-with-SHA224",
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256",
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384",
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512",
        "1.2.840.10040.4.3" => "dsa-with-sha1",
        "2.16.840.1.101.3.4.3.2" => "dsa-with-sha256",
        OID_ED25519 => "ed25519",
        OID_ED448 => "ed448",
        _ => return oid.to_string(),
    };
    name.to_string()
}

fn dns_names(cert: &X509Certificate<'_>) -> Vec<String> {
    cert.subject_alternative_name()
        .ok()
        .flatten()
        .map(|san| {
            san.value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
