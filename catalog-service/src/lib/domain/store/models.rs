/// An aggregate the transactional store knows how to persist.
///
/// `Draft` is the not-yet-persisted form; the store assigns the identifier on insert.
pub trait Entity: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    type Id: Copy + Send + Sync + std::fmt::Display + 'static;
    type Draft: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// A single write against one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<E: Entity> {
    Insert(E::Draft),
    Update(E),
    Delete(E),
}

impl<E: Entity> Mutation<E> {
    /// Short operation name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Insert(_) => "insert",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
        }
    }
}

/// Result of a committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<E> {
    /// The write touched a row; carries the entity as persisted (or as removed).
    Committed(E),

    /// The transaction committed but no row was affected.
    NoEffect,
}

impl<E> MutationOutcome<E> {
    pub fn into_committed(self) -> Option<E> {
        match self {
            MutationOutcome::Committed(entity) => Some(entity),
            MutationOutcome::NoEffect => None,
        }
    }
}
