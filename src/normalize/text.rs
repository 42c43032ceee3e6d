/// Replace accented Latin letters with their base letter.
pub fn strip_accents(s: &str) -> String {
    s.chars().map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Upper-cased, accent-free and whitespace-free form used for keyword matching.
///
/// `"Saldo do Dia"` and `"SALDO DO DIA"` both become `"SALDODODIA"`.
pub fn normalized_key(s: &str) -> String {
    strip_accents(s)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Drop control characters and anything outside printable Latin-1.
pub fn sanitize_text(s: &str) -> String {
    s.chars()
        .filter(|&c| matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF))
        .collect::<String>()
        .trim()
        .to_string()
}
