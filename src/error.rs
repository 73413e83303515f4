use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Recoverable failures reported by the Pokedex tree, the owner registry
/// and the menu operations built on top of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PokedexError {
    /// The id is already present in the target Pokedex.
    DuplicateKey(u32),
    /// The id is not present in the target Pokedex.
    NotFound(u32),
    /// The Pokedex or the registry has nothing to operate on.
    EmptyCollection,
    /// Sorting or merging needs at least two owners.
    InsufficientMembers,
    /// An owner with this name is already registered.
    DuplicateOwner(String),
    /// No owner matches the given name, position or handle.
    OwnerNotFound(String),
    /// A merge named the same owner twice.
    SameOwner(String),
    /// The id is outside the catalog.
    NotInCatalog(u32),
    /// The record exists but has no next evolution stage.
    CannotEvolve { id: u32, name: String },
    /// Rejected user input (empty name, unparsable number, ...).
    InvalidInput(String),
}

impl Display for PokedexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(id) => {
                write!(f, "Pokemon with ID {id} is already in the Pokedex. No changes made.")
            }
            Self::NotFound(id) => write!(f, "No Pokemon with ID {id} found."),
            Self::EmptyCollection => write!(f, "Nothing to show: the collection is empty."),
            Self::InsufficientMembers => write!(f, "Not enough owners (need at least 2)."),
            Self::DuplicateOwner(name) => {
                write!(f, "Owner '{name}' already exists. Not creating a new Pokedex.")
            }
            Self::OwnerNotFound(what) => write!(f, "No owner found: {what}"),
            Self::SameOwner(name) => write!(f, "Cannot merge '{name}' with itself."),
            Self::NotInCatalog(id) => write!(f, "ID {id} is not in the catalog (1-151)."),
            Self::CannotEvolve { id, name } => write!(f, "{name} (ID {id}) cannot evolve."),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
        }
    }
}

impl std::error::Error for PokedexError {}

pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

#[derive(Debug)]
pub struct WithContextError {
    pub context: String,
    pub source: DynError,
}

impl Display for WithContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl std::error::Error for WithContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(WithContextError {
                context: f(),
                source: e.into(),
            }) as DynError
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_source_error() {
        let res: std::result::Result<(), PokedexError> = Err(PokedexError::NotFound(7));
        let err = res.with_ctx(|| "release".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "release: No Pokemon with ID 7 found.");
        assert!(std::error::Error::source(&*err).is_some());
    }

    #[test]
    fn messages_name_the_offending_value() {
        assert!(PokedexError::DuplicateOwner("Ash".into()).to_string().contains("Ash"));
        assert!(
            PokedexError::CannotEvolve { id: 3, name: "Venusaur".into() }
                .to_string()
                .contains("Venusaur (ID 3)")
        );
    }
}
