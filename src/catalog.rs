//! Static catalog of the 151 record templates.
//!
//! New records are always cloned out of this table; it is never mutated.

use std::fmt::{Display, Formatter};

use crate::error::PokedexError;

/// Elemental category of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Grass,
    Fire,
    Water,
    Bug,
    Normal,
    Poison,
    Electric,
    Ground,
    Fairy,
    Fighting,
    Psychic,
    Rock,
    Ghost,
    Dragon,
    Ice,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Grass => "GRASS",
            Category::Fire => "FIRE",
            Category::Water => "WATER",
            Category::Bug => "BUG",
            Category::Normal => "NORMAL",
            Category::Poison => "POISON",
            Category::Electric => "ELECTRIC",
            Category::Ground => "GROUND",
            Category::Fairy => "FAIRY",
            Category::Fighting => "FIGHTING",
            Category::Psychic => "PSYCHIC",
            Category::Rock => "ROCK",
            Category::Ghost => "GHOST",
            Category::Dragon => "DRAGON",
            Category::Ice => "ICE",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One owned record, cloned from a catalog template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub hp: u32,
    pub power: u32,
    pub evolvable: bool,
}

impl Record {
    /// Battle score used by the fight action: power * 1.5 + hp * 1.2.
    pub fn battle_score(&self) -> f64 {
        f64::from(self.power) * 1.5 + f64::from(self.hp) * 1.2
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Type: {}, HP: {}, Attack: {}, Can Evolve: {}",
            self.id,
            self.name,
            self.category,
            self.hp,
            self.power,
            if self.evolvable { "Yes" } else { "No" }
        )
    }
}

struct Template {
    id: u32,
    name: &'static str,
    category: Category,
    hp: u32,
    power: u32,
    evolvable: bool,
}

const fn row(
    id: u32,
    name: &'static str,
    category: Category,
    hp: u32,
    power: u32,
    evolvable: bool,
) -> Template {
    Template { id, name, category, hp, power, evolvable }
}

use Category::*;

/// Highest id present in the catalog.
pub const MAX_ID: u32 = 151;

static TEMPLATES: [Template; MAX_ID as usize] = [
    row(1, "Bulbasaur", Grass, 45, 49, true),
    row(2, "Ivysaur", Grass, 60, 62, true),
    row(3, "Venusaur", Grass, 80, 82, false),
    row(4, "Charmander", Fire, 39, 52, true),
    row(5, "Charmeleon", Fire, 58, 64, true),
    row(6, "Charizard", Fire, 78, 84, false),
    row(7, "Squirtle", Water, 44, 48, true),
    row(8, "Wartortle", Water, 59, 63, true),
    row(9, "Blastoise", Water, 79, 83, false),
    row(10, "Caterpie", Bug, 45, 30, true),
    row(11, "Metapod", Bug, 50, 20, true),
    row(12, "Butterfree", Bug, 60, 45, false),
    row(13, "Weedle", Bug, 40, 35, true),
    row(14, "Kakuna", Bug, 45, 25, true),
    row(15, "Beedrill", Bug, 65, 90, false),
    row(16, "Pidgey", Normal, 40, 45, true),
    row(17, "Pidgeotto", Normal, 63, 60, true),
    row(18, "Pidgeot", Normal, 83, 80, false),
    row(19, "Rattata", Normal, 30, 56, true),
    row(20, "Raticate", Normal, 55, 81, false),
    row(21, "Spearow", Normal, 40, 60, true),
    row(22, "Fearow", Normal, 65, 90, false),
    row(23, "Ekans", Poison, 35, 60, true),
    row(24, "Arbok", Poison, 60, 85, false),
    row(25, "Pikachu", Electric, 35, 55, true),
    row(26, "Raichu", Electric, 60, 90, false),
    row(27, "Sandshrew", Ground, 50, 75, true),
    row(28, "Sandslash", Ground, 75, 100, false),
    row(29, "NidoranF", Poison, 55, 47, true),
    row(30, "Nidorina", Poison, 70, 62, true),
    row(31, "Nidoqueen", Poison, 90, 92, false),
    row(32, "NidoranM", Poison, 46, 57, true),
    row(33, "Nidorino", Poison, 61, 72, true),
    row(34, "Nidoking", Poison, 81, 102, false),
    row(35, "Clefairy", Fairy, 70, 45, true),
    row(36, "Clefable", Fairy, 95, 70, false),
    row(37, "Vulpix", Fire, 38, 41, true),
    row(38, "Ninetales", Fire, 73, 76, false),
    row(39, "Jigglypuff", Normal, 115, 45, true),
    row(40, "Wigglytuff", Normal, 140, 70, false),
    row(41, "Zubat", Poison, 40, 45, true),
    row(42, "Golbat", Poison, 75, 80, true),
    row(43, "Oddish", Grass, 45, 50, true),
    row(44, "Gloom", Grass, 60, 65, true),
    row(45, "Vileplume", Grass, 75, 80, false),
    row(46, "Paras", Bug, 35, 70, true),
    row(47, "Parasect", Bug, 60, 95, false),
    row(48, "Venonat", Bug, 60, 55, true),
    row(49, "Venomoth", Bug, 70, 65, false),
    row(50, "Diglett", Ground, 10, 55, true),
    row(51, "Dugtrio", Ground, 35, 80, false),
    row(52, "Meowth", Normal, 40, 45, true),
    row(53, "Persian", Normal, 65, 70, false),
    row(54, "Psyduck", Water, 50, 52, true),
    row(55, "Golduck", Water, 80, 82, false),
    row(56, "Mankey", Fighting, 40, 80, true),
    row(57, "Primeape", Fighting, 65, 105, false),
    row(58, "Growlithe", Fire, 55, 70, true),
    row(59, "Arcanine", Fire, 90, 110, false),
    row(60, "Poliwag", Water, 40, 50, true),
    row(61, "Poliwhirl", Water, 65, 65, true),
    row(62, "Poliwrath", Water, 90, 95, false),
    row(63, "Abra", Psychic, 25, 20, true),
    row(64, "Kadabra", Psychic, 40, 35, true),
    row(65, "Alakazam", Psychic, 55, 50, false),
    row(66, "Machop", Fighting, 70, 80, true),
    row(67, "Machoke", Fighting, 80, 100, true),
    row(68, "Machamp", Fighting, 90, 130, false),
    row(69, "Bellsprout", Grass, 50, 75, true),
    row(70, "Weepinbell", Grass, 65, 90, true),
    row(71, "Victreebel", Grass, 80, 105, false),
    row(72, "Tentacool", Water, 40, 40, true),
    row(73, "Tentacruel", Water, 80, 70, false),
    row(74, "Geodude", Rock, 40, 80, true),
    row(75, "Graveler", Rock, 55, 95, true),
    row(76, "Golem", Rock, 80, 120, false),
    row(77, "Ponyta", Fire, 50, 85, true),
    row(78, "Rapidash", Fire, 65, 100, false),
    row(79, "Slowpoke", Water, 90, 65, true),
    row(80, "Slowbro", Water, 95, 75, false),
    row(81, "Magnemite", Electric, 25, 35, true),
    row(82, "Magneton", Electric, 50, 60, false),
    row(83, "Farfetch'd", Normal, 52, 65, false),
    row(84, "Doduo", Normal, 35, 85, true),
    row(85, "Dodrio", Normal, 60, 110, false),
    row(86, "Seel", Water, 65, 45, true),
    row(87, "Dewgong", Water, 90, 70, false),
    row(88, "Grimer", Poison, 80, 80, true),
    row(89, "Muk", Poison, 105, 105, false),
    row(90, "Shellder", Water, 30, 65, true),
    row(91, "Cloyster", Water, 50, 95, false),
    row(92, "Gastly", Ghost, 30, 35, true),
    row(93, "Haunter", Ghost, 45, 50, true),
    row(94, "Gengar", Ghost, 60, 65, false),
    row(95, "Onix", Rock, 35, 45, false),
    row(96, "Drowzee", Psychic, 60, 48, true),
    row(97, "Hypno", Psychic, 85, 73, false),
    row(98, "Krabby", Water, 30, 105, true),
    row(99, "Kingler", Water, 55, 130, false),
    row(100, "Voltorb", Electric, 40, 30, true),
    row(101, "Electrode", Electric, 60, 50, false),
    row(102, "Exeggcute", Grass, 60, 40, true),
    row(103, "Exeggutor", Grass, 95, 95, false),
    row(104, "Cubone", Ground, 50, 50, true),
    row(105, "Marowak", Ground, 60, 80, false),
    row(106, "Hitmonlee", Fighting, 50, 120, false),
    row(107, "Hitmonchan", Fighting, 50, 105, false),
    row(108, "Lickitung", Normal, 90, 55, false),
    row(109, "Koffing", Poison, 40, 65, true),
    row(110, "Weezing", Poison, 65, 90, false),
    row(111, "Rhyhorn", Ground, 80, 85, true),
    row(112, "Rhydon", Ground, 105, 130, false),
    row(113, "Chansey", Normal, 250, 5, false),
    row(114, "Tangela", Grass, 65, 55, false),
    row(115, "Kangaskhan", Normal, 105, 95, false),
    row(116, "Horsea", Water, 30, 40, true),
    row(117, "Seadra", Water, 55, 65, false),
    row(118, "Goldeen", Water, 45, 67, true),
    row(119, "Seaking", Water, 80, 92, false),
    row(120, "Staryu", Water, 30, 45, true),
    row(121, "Starmie", Water, 60, 75, false),
    row(122, "Mr. Mime", Psychic, 40, 45, false),
    row(123, "Scyther", Bug, 70, 110, false),
    row(124, "Jynx", Ice, 65, 50, false),
    row(125, "Electabuzz", Electric, 65, 83, false),
    row(126, "Magmar", Fire, 65, 95, false),
    row(127, "Pinsir", Bug, 65, 125, false),
    row(128, "Tauros", Normal, 75, 100, false),
    row(129, "Magikarp", Water, 20, 10, true),
    row(130, "Gyarados", Water, 95, 125, false),
    row(131, "Lapras", Water, 130, 85, false),
    row(132, "Ditto", Normal, 48, 48, false),
    row(133, "Eevee", Normal, 55, 55, true),
    row(134, "Vaporeon", Water, 130, 65, false),
    row(135, "Jolteon", Electric, 65, 65, false),
    row(136, "Flareon", Fire, 65, 130, false),
    row(137, "Porygon", Normal, 65, 60, false),
    row(138, "Omanyte", Rock, 35, 40, true),
    row(139, "Omastar", Rock, 70, 60, false),
    row(140, "Kabuto", Rock, 30, 80, true),
    row(141, "Kabutops", Rock, 60, 115, false),
    row(142, "Aerodactyl", Rock, 80, 105, false),
    row(143, "Snorlax", Normal, 160, 110, false),
    row(144, "Articuno", Ice, 90, 85, false),
    row(145, "Zapdos", Electric, 90, 90, false),
    row(146, "Moltres", Fire, 90, 100, false),
    row(147, "Dratini", Dragon, 41, 64, true),
    row(148, "Dragonair", Dragon, 61, 84, true),
    row(149, "Dragonite", Dragon, 91, 134, false),
    row(150, "Mewtwo", Psychic, 106, 110, false),
    row(151, "Mew", Psychic, 100, 100, false),
];

/// Clone the template for `id` into a fresh record.
pub fn template(id: u32) -> Result<Record, PokedexError> {
    let idx = id.checked_sub(1).ok_or(PokedexError::NotInCatalog(id))? as usize;
    let t = TEMPLATES.get(idx).ok_or(PokedexError::NotInCatalog(id))?;
    Ok(Record {
        id: t.id,
        name: t.name.to_string(),
        category: t.category,
        hp: t.hp,
        power: t.power,
        evolvable: t.evolvable,
    })
}

/// The three starters offered when a new Pokedex is opened.
pub fn starters() -> [(u32, &'static str); 3] {
    [(1, "Bulbasaur"), (4, "Charmander"), (7, "Squirtle")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_match_positions() {
        for (i, t) in TEMPLATES.iter().enumerate() {
            assert_eq!(t.id as usize, i + 1, "row {} out of place", t.name);
        }
    }

    #[test]
    fn template_bounds() {
        assert_eq!(template(0), Err(PokedexError::NotInCatalog(0)));
        assert_eq!(template(152), Err(PokedexError::NotInCatalog(152)));
        let mew = template(151).unwrap();
        assert_eq!(mew.name, "Mew");
        assert_eq!(mew.category, Category::Psychic);
        assert!(!mew.evolvable);
    }

    #[test]
    fn starters_exist_and_can_evolve() {
        for (id, name) in starters() {
            let r = template(id).unwrap();
            assert_eq!(r.name, name);
            assert!(r.evolvable);
        }
    }

    #[test]
    fn battle_score_weights_power_over_hp() {
        let pikachu = template(25).unwrap();
        assert!((pikachu.battle_score() - (55.0 * 1.5 + 35.0 * 1.2)).abs() < 1e-9);
    }

    #[test]
    fn record_display_line() {
        let r = template(4).unwrap();
        assert_eq!(
            r.to_string(),
            "ID: 4, Name: Charmander, Type: FIRE, HP: 39, Attack: 52, Can Evolve: Yes"
        );
    }
}
