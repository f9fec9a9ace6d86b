//! Provider identification by signature strings.

use tracing::debug;

use crate::models::record::ProviderKind;
use crate::pdf::RawDocument;

/// Signature strings per provider, in tie-break priority order.
const SIGNATURES: [(ProviderKind, &[&str]); 4] = [
    (ProviderKind::Ip, &["IP PLUS S.R.L", "IP PLUS", "IP Plus"]),
    (
        ProviderKind::Esso,
        &["WEX Europe Services", "ESSO CARD", "essocard"],
    ),
    (
        ProviderKind::Q8,
        &[
            "Kuwait Petroleum Italia",
            "CartissimaQ8",
            "Cartissima Q8",
            "CARTISSIMA Q8",
        ],
    ),
    (
        ProviderKind::Tamoil,
        &["TAMOIL ITALIA S.p.A.", "TAMOIL", "mycard"],
    ),
];

/// Identify which provider issued a document.
///
/// The provider owning the longest matching signature wins; equal lengths
/// go to the earlier provider in [`ProviderKind::SUPPORTED`].
pub fn detect(document: &RawDocument) -> ProviderKind {
    detect_text(document.text())
}

/// Same as [`detect`], on plain text.
pub fn detect_text(text: &str) -> ProviderKind {
    let mut best: Option<(ProviderKind, &str)> = None;

    for (kind, signatures) in SIGNATURES {
        for &signature in signatures {
            if !text.contains(signature) {
                continue;
            }
            if best.is_none_or(|(_, current)| signature.len() > current.len()) {
                best = Some((kind, signature));
            }
        }
    }

    match best {
        Some((kind, signature)) => {
            debug!("Detected provider {} by signature {:?}", kind, signature);
            kind
        }
        None => {
            debug!("No provider signature found");
            ProviderKind::Unknown
        }
    }
}
