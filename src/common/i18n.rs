// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANG: &str = "en";

// Os arquivos de tradução vão embutidos no binário
const BUNDLES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Idiomas com arquivo de tradução embutido.
pub fn is_bundled(lang: &str) -> bool {
    BUNDLES.iter().any(|(bundled, _)| *bundled == lang)
}

/// Dicionário de mensagens por idioma (`lang -> chave -> texto`).
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in BUNDLES {
            let bundle: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Arquivo de idioma '{}' inválido: {}", lang, e))?;
            messages.insert(lang.to_string(), bundle);
        }
        Ok(Self { messages: Arc::new(messages) })
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.messages.contains_key(lang)
    }

    /// Busca a mensagem no idioma pedido, depois no idioma padrão e, por fim, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|bundle| bundle.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|bundle| bundle.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Igual ao `translate`, trocando os marcadores `{nome}` pelos valores.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.translate(lang, key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundles_have_the_same_keys() {
        let store = I18nStore::load().expect("bundles válidos");
        let en = store.messages.get("en").unwrap();
        let pt = store.messages.get("pt").unwrap();
        let mut en_keys: Vec<_> = en.keys().collect();
        let mut pt_keys: Vec<_> = pt.keys().collect();
        en_keys.sort();
        pt_keys.sort();
        assert_eq!(en_keys, pt_keys);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("de", "error.empty_cart"), "The cart is empty.");
        assert_eq!(store.translate("pt", "error.empty_cart"), "O carrinho está vazio.");
    }

    #[test]
    fn unknown_key_returns_the_key() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("en", "error.nope"), "error.nope");
    }

    #[test]
    fn placeholders_are_replaced() {
        let store = I18nStore::load().unwrap();
        let text = store.translate_with(
            "en",
            "error.insufficient_stock",
            &[("product", "Cola".into()), ("available", "3".into())],
        );
        assert_eq!(text, "Insufficient stock for Cola (available: 3).");
    }
}
