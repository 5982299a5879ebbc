use thiserror::Error;

use crate::types::AccountType;

/// Erros possíveis durante o parsing de extratos OFX
#[derive(Error, Debug)]
pub enum StatementParseError {
    /// Falha genérica durante o parsing do conteúdo (detalhe na mensagem)
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// Campo do cabeçalho SGML diferente do valor exigido
    #[error("Invalid header field {index}: expected {expected}, found {found:?}")]
    InvalidHeader {
        index: usize,
        expected: &'static str,
        found: String,
    },

    /// Seção ou campo obrigatório ausente no documento
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Valor numérico que não pôde ser convertido para decimal
    #[error("Invalid decimal for {field}: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },

    /// Data no formato OFX com tamanho suficiente, mas que não é uma data válida
    #[error("Invalid OFX date: {0:?}")]
    OfxDateInvalidFormat(String),

    /// Tipo de conta sem mapeamento de caminhos (apenas BANK e CREDIT_CARD)
    #[error("Account type not supported: {0:?}")]
    UnsupportedAccountType(AccountType),

    /// Formato do arquivo não é suportado pela biblioteca
    #[error("Unsupported file format")]
    UnsupportedFormat,

    /// Erro ao ler o conteúdo do arquivo do disco
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// O builder foi chamado sem fornecer conteúdo nem caminho de arquivo
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,
}

/// Categoria do erro: falha estrutural (o núcleo não sabe tratar o caso),
/// conteúdo malformado, ou falha na obtenção da entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Parse,
    Input,
}

impl StatementParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedAccountType(_) => ErrorKind::Structural,
            Self::ParseFailed(_)
            | Self::InvalidHeader { .. }
            | Self::NotFound(_)
            | Self::InvalidDecimal { .. }
            | Self::OfxDateInvalidFormat(_) => ErrorKind::Parse,
            Self::UnsupportedFormat
            | Self::ReadContentFailed(_)
            | Self::MissingContentAndFilepath => ErrorKind::Input,
        }
    }
}

/// Alias conveniente para Result com nosso tipo de erro principal
pub type StatementResult<T> = Result<T, StatementParseError>;
