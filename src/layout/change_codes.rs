//! Configuration-change codes written by the meter into its change log.

use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Descriptions of the change codes, as the meter documentation names them.
pub static CHANGE_CODES: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(11, "Envio de senha");
    map.insert(12, "Programação de código de cliente");
    map.insert(13, "Pedido de string");
    map.insert(20, "Leitura com reposição de demanda");
    map.insert(21, "Leitura s/ reposição atuais");
    map.insert(22, "Leitura s/ reposição anteriores");
    map.insert(23, "Leitura de regs. após última reposição");
    map.insert(99, "Comando para carga rápida de programa");
    map
});

/// Description of a change code, or `Código desconhecido (N)` when unknown.
pub fn describe_change(code: u8) -> String {
    match CHANGE_CODES.get(&code) {
        Some(description) => description.to_string(),
        None => format!("Código desconhecido ({code})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe_change(11), "Envio de senha");
        assert_eq!(describe_change(20), "Leitura com reposição de demanda");
        assert_eq!(describe_change(99), "Comando para carga rápida de programa");
    }

    #[test]
    fn test_unknown_code_fallback() {
        assert_eq!(describe_change(42), "Código desconhecido (42)");
        assert_eq!(describe_change(0), "Código desconhecido (0)");
    }
}
