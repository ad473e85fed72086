//! Tipos de Erro da Camada de Memória Virtual
//!
//! Define erros estruturados para diagnóstico preciso de falhas em VM.
//! Três categorias:
//! - **Validação**: rejeitada sincronamente, sem efeitos colaterais.
//! - **Exaustão**: sem frame ou sem slot de swap.
//! - **I/O**: leitura/escrita curta no serviço de arquivos ou erro de setor.
//!
//! Nenhum destes erros derruba o kernel: no caminho de page fault, qualquer
//! um deles mata apenas o processo que faltou.

/// Erros do subsistema de memória virtual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    // === Exaustão ===
    /// Sem frame físico e a eviction não encontrou vítima
    OutOfMemory,
    /// Todos os slots de swap estão ocupados
    SwapFull,

    // === I/O ===
    /// Arquivo retornou menos bytes que o esperado
    ShortRead,
    /// Arquivo aceitou menos bytes que o esperado
    ShortWrite,
    /// Erro do dispositivo de swap
    SwapIo,

    // === Validação ===
    /// Endereço nulo, de kernel ou fora do espaço de usuário
    InvalidAddress,
    /// Endereço não alinhado a página
    NotAligned,
    /// Região já possui descritor ou PTE
    AlreadyMapped,
    /// Nenhum descritor para o endereço
    NotMapped,
    /// Descritor de arquivo inválido ou de console
    BadDescriptor,
    /// Arquivo de tamanho zero
    EmptyFile,
    /// Serviço de arquivos não conseguiu reabrir o arquivo
    ReopenFailed,
    /// Id de mapeamento desconhecido
    NoSuchMapping,
    /// Fault abaixo da janela de probe ou além do limite da stack
    StackLimit,
    /// Escrita em página somente leitura
    ProtectionViolation,
    /// MMU recusou instalar o mapeamento
    MappingFailed,
    /// Processo dono não encontrado no diretório
    ProcessNotFound,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OOM: sem frames físicos e sem vítima para eviction",
            Self::SwapFull => "Swap cheio: nenhum slot livre",
            Self::ShortRead => "Leitura curta do arquivo",
            Self::ShortWrite => "Escrita curta no arquivo",
            Self::SwapIo => "Erro de I/O no dispositivo de swap",
            Self::InvalidAddress => "Endereço inválido",
            Self::NotAligned => "Endereço não alinhado a página",
            Self::AlreadyMapped => "Região já mapeada",
            Self::NotMapped => "Região não mapeada",
            Self::BadDescriptor => "Descritor de arquivo inválido",
            Self::EmptyFile => "Arquivo vazio não pode ser mapeado",
            Self::ReopenFailed => "Falha ao reabrir arquivo",
            Self::NoSuchMapping => "Mapeamento inexistente",
            Self::StackLimit => "Acesso fora da janela de crescimento da stack",
            Self::ProtectionViolation => "Escrita em página somente leitura",
            Self::MappingFailed => "Mapeamento falhou",
            Self::ProcessNotFound => "Processo não encontrado",
        }
    }
}

impl core::fmt::Display for MmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
