use thiserror::Error;

/// Raison pour laquelle une suite de numéros n'est pas une combinaison valide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CombinationError {
    #[error("{0} numéros au lieu de 6")]
    WrongLength(usize),

    #[error("numéro {0} hors limites (1-45)")]
    OutOfRange(u8),

    #[error("numéro en double : {0}")]
    Duplicate(u8),
}

/// Erreurs remontées à l'appelant du moteur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("stratégie inconnue : '{0}'")]
    UnknownStrategy(String),

    #[error("tirage #{index} invalide : {source}")]
    MalformedDraw {
        index: usize,
        #[source]
        source: CombinationError,
    },
}

/// Échec « doux » d'une stratégie. Le moteur le remplace toujours par un
/// tirage uniforme, l'appelant de `generate` ne le voit jamais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fallback {
    #[error("historique insuffisant ({available} tirages, {required} requis)")]
    InsufficientData { required: usize, available: usize },

    #[error("aucun candidat retenu après {trials} essais")]
    SamplingExhausted { trials: usize },

    #[error("poids de tirage dégénérés")]
    DegenerateWeights,
}
