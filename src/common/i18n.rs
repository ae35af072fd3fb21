// src/common/i18n.rs

use std::collections::HashMap;

use crate::middleware::i18n::Locale;

pub const DEFAULT_LANG: &str = "en";

// Catálogos de mensagens. A chave é o código do erro (o mesmo que vai nos
// `message` do validator e nas variantes do AppError).
const EN: &[(&str, &str)] = &[
    // Cabeçalhos de erro
    ("validation_failed", "One or more fields are invalid."),
    ("not_found", "Not found."),
    ("unauthorized", "Authentication credentials were not provided."),
    ("invalid_token", "Invalid or expired authentication token."),
    ("invalid_credentials", "Invalid username or password."),
    ("internal_error", "An unexpected error occurred."),
    // Erros de campo
    ("required", "This field is required."),
    ("invalid_length", "Ensure this field has a valid length."),
    ("invalid_email", "Enter a valid email address."),
    ("invalid_url", "Enter a valid URL."),
    ("invalid_choice", "Value is not a valid choice."),
    ("not_an_object", "Expected a JSON object."),
    ("must_be_positive", "Ensure this value is greater than zero."),
    ("min_value", "Ensure this value is greater than or equal to 0."),
    ("max_decimal_places", "Ensure that there are no more than 2 decimal places."),
    ("max_digits", "Ensure that there are no more than 10 digits in total."),
    ("unique", "This value is already in use."),
    ("does_not_exist", "Object does not exist."),
    ("password_too_short", "This password is too short. It must contain at least 8 characters."),
    ("password_mismatch", "Password fields didn't match."),
    ("wrong_password", "Old password is not correct."),
    ("invalid_value", "Enter a valid value."),
    ("invalid_json", "Malformed JSON body."),
    // Mensagens de sucesso
    ("user_registered", "User registered successfully."),
    ("password_changed", "Password updated successfully."),
];

const PT: &[(&str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("not_found", "Não encontrado."),
    ("unauthorized", "As credenciais de autenticação não foram fornecidas."),
    ("invalid_token", "Token de autenticação inválido ou expirado."),
    ("invalid_credentials", "Usuário ou senha inválidos."),
    ("internal_error", "Ocorreu um erro inesperado."),
    ("required", "Este campo é obrigatório."),
    ("invalid_length", "Este campo tem um tamanho inválido."),
    ("invalid_email", "Informe um e-mail válido."),
    ("invalid_url", "Informe uma URL válida."),
    ("invalid_choice", "Valor não é uma opção válida."),
    ("not_an_object", "Era esperado um objeto JSON."),
    ("must_be_positive", "Este valor deve ser maior que zero."),
    ("min_value", "Este valor deve ser maior ou igual a 0."),
    ("max_decimal_places", "Use no máximo 2 casas decimais."),
    ("max_digits", "Use no máximo 10 dígitos no total."),
    ("unique", "Este valor já está em uso."),
    ("does_not_exist", "Objeto não existe."),
    ("password_too_short", "Esta senha é muito curta. Ela precisa ter pelo menos 8 caracteres."),
    ("password_mismatch", "As senhas não conferem."),
    ("wrong_password", "A senha atual está incorreta."),
    ("invalid_value", "Informe um valor válido."),
    ("invalid_json", "Corpo JSON malformado."),
    ("user_registered", "Usuário cadastrado com sucesso."),
    ("password_changed", "Senha alterada com sucesso."),
];

/// Guarda os catálogos carregados. Vive no `AppState` e é só leitura.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("en", EN.iter().copied().collect());
        catalogs.insert("pt", PT.iter().copied().collect());
        Self { catalogs }
    }

    /// Traduz uma chave. Idioma desconhecido cai no inglês; chave desconhecida
    /// volta como está.
    pub fn translate(&self, locale: &Locale, key: &str) -> String {
        self.catalogs
            .get(locale.0.as_str())
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LANG)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(|message| message.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_to_the_key() {
        let store = I18nStore::new();

        assert_eq!(
            store.translate(&Locale("pt".into()), "required"),
            "Este campo é obrigatório."
        );
        assert_eq!(
            store.translate(&Locale("de".into()), "required"),
            "This field is required."
        );
        assert_eq!(store.translate(&Locale("en".into()), "no_such_key"), "no_such_key");
    }

    #[test]
    fn catalogs_have_the_same_keys() {
        let en: Vec<_> = EN.iter().map(|(key, _)| *key).collect();
        let pt: Vec<_> = PT.iter().map(|(key, _)| *key).collect();
        assert_eq!(en, pt);
    }
}
