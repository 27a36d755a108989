//! Word pools for synthetic titles and taxonomy names.

pub const TITLE_WORDS: &[&str] = &[
    "ancient", "arctic", "bazaar", "castle", "citadel", "clockwork", "coral", "crimson", "crown",
    "delta", "dragon", "dune", "echo", "ember", "empire", "forest", "frontier", "galaxy",
    "garden", "harbor", "horizon", "iron", "island", "jade", "kingdom", "lantern", "legacy",
    "meadow", "merchant", "moon", "oasis", "orchard", "pirate", "quarry", "railway", "river",
    "ruins", "saga", "summit", "temple", "tide", "tower", "valley", "voyage", "wild", "winter",
];

pub const DESCRIPTION_WORDS: &[&str] = &[
    "players", "build", "trade", "explore", "cards", "tiles", "resources", "engine", "route",
    "score", "points", "rounds", "draft", "workers", "market", "map", "hidden", "bonus", "turn",
    "strategy", "luck", "victory", "board", "tokens", "objectives", "rivals", "alliances",
];

pub const CATEGORIES: &[&str] = &[
    "Abstract Strategy",
    "Adventure",
    "Card Game",
    "Economic",
    "Exploration",
    "Fantasy",
    "Medieval",
    "Science Fiction",
    "Wargame",
];

pub const MECHANICS: &[&str] = &[
    "Area Majority",
    "Cooperative Game",
    "Deck Building",
    "Dice Rolling",
    "Hand Management",
    "Set Collection",
    "Tile Placement",
    "Trading",
    "Worker Placement",
];

pub const FAMILIES: &[&str] = &[
    "Animals: Birds",
    "Components: Miniatures",
    "Country: Japan",
    "Digital Implementations",
    "Solitaire Games",
    "Sports: Racing",
    "Theme: Pirates",
    "Theme: Space Exploration",
    "Theme: Trains",
];

pub const DESIGNERS: &[&str] = &[
    "Ada Lindqvist",
    "Bruno Casale",
    "Chiara Moretti",
    "Dmitri Volkov",
    "Elena Brandt",
    "Farid Haddad",
    "Greta Olsen",
    "Hiro Tanaka",
    "Ines Duarte",
];
