use encoding_rs::WINDOWS_1252;
use tracing::warn;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode a raw statement file.
///
/// Bank exports arrive either as UTF-8 or as Latin-1/Windows-1252. UTF-8 is
/// tried first; if that yields replacement characters the bytes are decoded
/// again as Windows-1252, which maps every byte.
pub(crate) fn decode_statement(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let utf8 = String::from_utf8_lossy(bytes);
    if !utf8.contains('\u{FFFD}') {
        return utf8.into_owned();
    }

    warn!("statement is not valid UTF-8, decoding as Windows-1252");
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_statement("Histórico;Valor".as_bytes()), "Histórico;Valor");
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Data,Valor");
        assert_eq!(decode_statement(&bytes), "Data,Valor");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "Aplicação" in ISO-8859-1
        let bytes = b"Aplica\xe7\xe3o Poupan\xe7a";
        assert_eq!(decode_statement(bytes), "Aplicação Poupança");
    }
}
