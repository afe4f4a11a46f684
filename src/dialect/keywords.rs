//! Built-in keyword tables of the Portuguese dialect.
//!
//! These are declarative: `TranslationTable` turns them into token patterns.

/// word -> host word
pub const SINGLES: &[(&str, &str)] = &[
    ("enquanto", "while"),
    ("para", "for"),
    ("se", "if"),
    ("senão", "else"),
    ("senao", "else"),
    ("retornar", "return"),
    ("retorne", "return"),
    ("gerar", "yield"),
    ("gere", "yield"),
    ("função", "def"),
    ("funcao", "def"),
    ("definir", "def"),
    ("defina", "def"),
    ("classe", "class"),
    ("tente", "try"),
    ("tentar", "try"),
    ("exceção", "except"),
    ("excecao", "except"),
    ("finalmente", "finally"),
    ("apague", "del"),
    ("apagar", "del"),
    ("prossiga", "pass"),
    ("prosseguir", "pass"),
    ("importe", "import"),
    ("importar", "import"),
    ("como", "as"),
    ("quebre", "break"),
    ("quebrar", "break"),
    ("continuar", "continue"),
    ("não", "not"),
    ("nao", "not"),
    ("e", "and"),
    ("ou", "or"),
    ("é", "is"),
    ("eh", "is"),
    ("em", "in"),
    ("na", "in"),
    ("no", "in"),
    ("Verdadeiro", "True"),
    ("verdadeiro", "True"),
    ("Falso", "False"),
    ("falso", "False"),
    ("Nulo", "None"),
    ("nulo", "None"),
    ("afirme", "assert"),
    ("afirmar", "assert"),
    ("levante", "raise"),
    ("levantar", "raise"),
    ("com", "with"),
];

/// word sequence -> replacement words (possibly empty)
pub const SEQUENCES: &[(&[&str], &[&str])] = &[
    (&["para", "cada"], &["for"]),
    (&["faça", ":"], &[":"]),
    (&["fazer", ":"], &[":"]),
    (&["faca", ":"], &[":"]),
    (&["então", ":"], &[":"]),
    (&["entao", ":"], &[":"]),
    (&["então", "faça", ":"], &[":"]),
    (&["ou", "então", "se"], &["elif"]),
    (&["ou", "entao", "se"], &["elif"]),
    (&["ou", "se"], &["elif"]),
    (&["senão", "se"], &["elif"]),
    (&["senao", "se"], &["elif"]),
    (&["definir", "função"], &["def"]),
    (&["defina", "função"], &["def"]),
    (&["definir", "classe"], &["class"]),
    (&["defina", "classe"], &["class"]),
    (&["não", "é"], &["is", "not"]),
    (&["não", "eh"], &["is", "not"]),
    (&["nao", "eh"], &["is", "not"]),
    (&["não", "em"], &["not", "in"]),
];

/// forbidden sequences and the message they raise
pub const ERRORS: &[(&[&str], &str)] = &[
    (&["faça", "faça"], "keyword 'faça' repeated"),
    (&["faça", "fazer"], "'faça' and 'fazer' cannot be used together"),
    (&["fazer", "faça"], "'fazer' and 'faça' cannot be used together"),
    (&["então", "então"], "keyword 'então' repeated"),
];

/// Keywords that open a bounded repeat: `repetir N vezes:`
pub const REPEAT_KEYWORDS: &[&str] = &["repetir", "repita"];
pub const REPEAT_TIMES: &str = "vezes";

/// Numeric range: `de A até B a cada C`
pub const RANGE_FROM: &str = "de";
pub const RANGE_TO: &[&str] = &["até", "ate"];
pub const RANGE_STEP: &[&str] = &["a", "cada"];

/// Fresh loop variable introduced by `repetir`
pub const DEFAULT_FRESH_NAME: &str = "___";
