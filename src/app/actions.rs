//! Menu operations against the registry and the owners' Pokedexes.
//!
//! The TUI turns key presses into a [`PendingAction`]; [`perform`] runs it
//! against the registry and reports an [`ActionOutcome`] or a
//! [`PokedexError`]. Nothing here touches the terminal.

use std::fmt::{Display, Formatter};

use tracing::{info, warn};

use crate::catalog::{self, Record};
use crate::error::PokedexError;
use crate::pokedex::{DisplayOrder, MergeReport, PokedexTree};
use crate::registry::{Direction, Owner, OwnerId, OwnerRegistry};

/// Longest walk the owners menu will print.
pub const MAX_WALK_STEPS: usize = 10_000;

/// Operations the user can request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    CreatePokedex { name: String, starter: u32 },
    AddPokemon { owner: OwnerId, id: u32 },
    ReleasePokemon { owner: OwnerId, id: u32 },
    EvolvePokemon { owner: OwnerId, id: u32 },
    Fight { owner: OwnerId, first: u32, second: u32 },
    DeletePokedex { owner: OwnerId },
    MergePokedexes { target: OwnerId, source: OwnerId },
    SortOwners,
    WalkOwners { direction: Direction, count: usize },
}

/// What a successful action did, ready to show to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Created { owner: OwnerId, name: String, starter: String },
    Added { id: u32, name: String },
    Released { id: u32, name: String },
    Evolved { from: Record, to: Option<Record> },
    Fought { first: (String, f64), second: (String, f64), winner: Option<String> },
    Deleted { name: String, records: usize },
    Merged { target: String, source: String, report: MergeReport },
    Sorted,
    Walked { names: Vec<String> },
}

impl Display for ActionOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created { name, starter, .. } => {
                write!(f, "New Pokedex created for {name} with starter {starter}.")
            }
            Self::Added { id, name } => write!(f, "Pokemon {name} (ID {id}) added."),
            Self::Released { id, name } => write!(f, "Removing Pokemon {name} (ID {id})."),
            Self::Evolved { from, to: Some(to) } => write!(
                f,
                "Pokemon evolved from {} (ID {}) to {} (ID {}).",
                from.name, from.id, to.name, to.id
            ),
            Self::Evolved { from, to: None } => write!(
                f,
                "Evolution of {} (ID {}) already owned; released {}.",
                from.name,
                from.id + 1,
                from.name
            ),
            Self::Fought { first, second, winner } => {
                writeln!(f, "Pokemon 1: {} (Score = {:.2})", first.0, first.1)?;
                writeln!(f, "Pokemon 2: {} (Score = {:.2})", second.0, second.1)?;
                match winner {
                    Some(w) => write!(f, "{w} wins!"),
                    None => write!(f, "It's a tie!"),
                }
            }
            Self::Deleted { name, records } => {
                write!(f, "Deleted {name}'s entire Pokedex ({records} Pokemon).")
            }
            Self::Merged { target, source, report } => write!(
                f,
                "Merged {source} into {target}: {} moved, {} duplicates dropped. Owner '{source}' has been removed after merging.",
                report.moved.len(),
                report.discarded.len()
            ),
            Self::Sorted => write!(f, "Owners sorted by name."),
            Self::Walked { names } => {
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "[{}] {name}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Run `action` against `registry`. Failures leave the registry unchanged.
pub fn perform(
    registry: &mut OwnerRegistry,
    action: PendingAction,
) -> Result<ActionOutcome, PokedexError> {
    let res = match action.clone() {
        PendingAction::CreatePokedex { name, starter } => create_pokedex(registry, &name, starter),
        PendingAction::AddPokemon { owner, id } => add_pokemon(registry, owner, id),
        PendingAction::ReleasePokemon { owner, id } => release_pokemon(registry, owner, id),
        PendingAction::EvolvePokemon { owner, id } => evolve_pokemon(registry, owner, id),
        PendingAction::Fight { owner, first, second } => fight(registry, owner, first, second),
        PendingAction::DeletePokedex { owner } => delete_pokedex(registry, owner),
        PendingAction::MergePokedexes { target, source } => merge_pokedexes(registry, target, source),
        PendingAction::SortOwners => registry.sort_by_name().map(|()| ActionOutcome::Sorted),
        PendingAction::WalkOwners { direction, count } => walk_owners(registry, direction, count),
    };
    if let Err(e) = &res {
        warn!(?action, error = %e, "action rejected");
    }
    res
}

/// Records of `owner` in `order`, or `EmptyCollection`.
pub fn display(
    registry: &OwnerRegistry,
    owner: OwnerId,
    order: DisplayOrder,
) -> Result<Vec<&Record>, PokedexError> {
    let tree = &owner_ref(registry, owner)?.pokedex;
    if tree.is_empty() {
        return Err(PokedexError::EmptyCollection);
    }
    Ok(match order {
        DisplayOrder::Traversal(t) => tree.records(t),
        DisplayOrder::Alphabetical => tree.collect_sorted_by_name(),
    })
}

fn owner_ref(registry: &OwnerRegistry, id: OwnerId) -> Result<&Owner, PokedexError> {
    registry
        .get(id)
        .ok_or_else(|| PokedexError::OwnerNotFound(format!("{id:?}")))
}

fn owner_mut(registry: &mut OwnerRegistry, id: OwnerId) -> Result<&mut Owner, PokedexError> {
    registry
        .get_mut(id)
        .ok_or_else(|| PokedexError::OwnerNotFound(format!("{id:?}")))
}

fn create_pokedex(
    registry: &mut OwnerRegistry,
    name: &str,
    starter: u32,
) -> Result<ActionOutcome, PokedexError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PokedexError::InvalidInput("owner name is empty".to_string()));
    }
    if registry.find_by_name(name).is_some() {
        return Err(PokedexError::DuplicateOwner(name.to_string()));
    }
    if !catalog::starters().iter().any(|(id, _)| *id == starter) {
        return Err(PokedexError::InvalidInput(format!("{starter} is not a starter")));
    }
    let record = catalog::template(starter)?;
    let starter_name = record.name.clone();
    let owner = registry.insert(Owner::new(name, PokedexTree::with_record(record)));
    Ok(ActionOutcome::Created { owner, name: name.to_string(), starter: starter_name })
}

fn add_pokemon(
    registry: &mut OwnerRegistry,
    owner: OwnerId,
    id: u32,
) -> Result<ActionOutcome, PokedexError> {
    let record = catalog::template(id)?;
    let name = record.name.clone();
    owner_mut(registry, owner)?.pokedex.insert(record)?;
    Ok(ActionOutcome::Added { id, name })
}

fn release_pokemon(
    registry: &mut OwnerRegistry,
    owner: OwnerId,
    id: u32,
) -> Result<ActionOutcome, PokedexError> {
    let tree = &mut owner_mut(registry, owner)?.pokedex;
    if tree.is_empty() {
        return Err(PokedexError::EmptyCollection);
    }
    let record = tree.remove(id)?;
    Ok(ActionOutcome::Released { id, name: record.name })
}

fn evolve_pokemon(
    registry: &mut OwnerRegistry,
    owner: OwnerId,
    id: u32,
) -> Result<ActionOutcome, PokedexError> {
    let tree = &mut owner_mut(registry, owner)?.pokedex;
    if tree.is_empty() {
        return Err(PokedexError::EmptyCollection);
    }
    let current = tree.find(id).ok_or(PokedexError::NotFound(id))?;
    if !current.evolvable {
        return Err(PokedexError::CannotEvolve { id, name: current.name.clone() });
    }
    let evolved = catalog::template(id + 1)?;
    let from = tree.remove(id)?;
    if tree.contains(evolved.id) {
        return Ok(ActionOutcome::Evolved { from, to: None });
    }
    tree.insert(evolved.clone())?;
    Ok(ActionOutcome::Evolved { from, to: Some(evolved) })
}

fn fight(
    registry: &OwnerRegistry,
    owner: OwnerId,
    first: u32,
    second: u32,
) -> Result<ActionOutcome, PokedexError> {
    let tree = &owner_ref(registry, owner)?.pokedex;
    if tree.is_empty() {
        return Err(PokedexError::EmptyCollection);
    }
    let a = tree.find(first).ok_or(PokedexError::NotFound(first))?;
    let b = tree.find(second).ok_or(PokedexError::NotFound(second))?;
    let (sa, sb) = (a.battle_score(), b.battle_score());
    let winner = if sa > sb {
        Some(a.name.clone())
    } else if sb > sa {
        Some(b.name.clone())
    } else {
        None
    };
    Ok(ActionOutcome::Fought {
        first: (a.name.clone(), sa),
        second: (b.name.clone(), sb),
        winner,
    })
}

fn delete_pokedex(
    registry: &mut OwnerRegistry,
    owner: OwnerId,
) -> Result<ActionOutcome, PokedexError> {
    let mut removed = registry.remove(owner)?;
    let records = removed.pokedex.clear();
    info!(owner = %removed.name, records, "pokedex deleted");
    Ok(ActionOutcome::Deleted { name: removed.name, records })
}

fn merge_pokedexes(
    registry: &mut OwnerRegistry,
    target: OwnerId,
    source: OwnerId,
) -> Result<ActionOutcome, PokedexError> {
    if registry.len() < 2 {
        return Err(PokedexError::InsufficientMembers);
    }
    let target_name = owner_ref(registry, target)?.name.clone();
    owner_ref(registry, source)?;
    if target == source {
        return Err(PokedexError::SameOwner(target_name));
    }
    let absorbed = registry.remove(source)?;
    let report = owner_mut(registry, target)?.pokedex.merge_from(absorbed.pokedex);
    info!(
        target = %target_name,
        source = %absorbed.name,
        moved = report.moved.len(),
        discarded = report.discarded.len(),
        "pokedexes merged"
    );
    Ok(ActionOutcome::Merged { target: target_name, source: absorbed.name, report })
}

fn walk_owners(
    registry: &OwnerRegistry,
    direction: Direction,
    count: usize,
) -> Result<ActionOutcome, PokedexError> {
    if registry.is_empty() {
        return Err(PokedexError::EmptyCollection);
    }
    if count > MAX_WALK_STEPS {
        return Err(PokedexError::InvalidInput(format!(
            "step count {count} exceeds {MAX_WALK_STEPS}"
        )));
    }
    let names = registry
        .walk_iter(direction)
        .take(count)
        .filter_map(|id| registry.get(id).map(|o| o.name.clone()))
        .collect();
    Ok(ActionOutcome::Walked { names })
}
