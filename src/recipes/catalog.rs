use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Quick,
    Budget,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 6] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Snack,
        Self::Quick,
        Self::Budget,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Quick => "quick",
            Self::Budget => "budget",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Grams per serving.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RecipeMacros {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: &'static str,
    pub title: &'static str,
    pub category: RecipeCategory,
    pub time: &'static str,
    pub calories: u32,
    pub macros: RecipeMacros,
    pub ingredients: &'static [&'static str],
    pub steps: &'static [&'static str],
    pub is_premium: bool,
}

pub static RECIPES: &[Recipe] = &[
    Recipe {
        id: "1",
        title: "Overnight Oats de Frutos Vermelhos",
        category: RecipeCategory::Breakfast,
        time: "5 min (+noite)",
        calories: 320,
        macros: RecipeMacros { protein: 12, carbs: 45, fat: 8 },
        ingredients: &["Aveia", "Leite ou Bebida Vegetal", "Frutos Vermelhos", "Sementes de Chia"],
        steps: &[
            "Misturar aveia e leite num frasco.",
            "Adicionar chia e mexer.",
            "Deixar no frigorífico durante a noite.",
            "Adicionar frutas antes de servir.",
        ],
        is_premium: false,
    },
    Recipe {
        id: "2",
        title: "Salada de Frango e Quinoa",
        category: RecipeCategory::Lunch,
        time: "20 min",
        calories: 450,
        macros: RecipeMacros { protein: 35, carbs: 40, fat: 15 },
        ingredients: &["Peito de frango", "Quinoa cozida", "Espinafres", "Tomate cherry", "Azeite"],
        steps: &[
            "Grelhar o frango temperado.",
            "Misturar quinoa e vegetais.",
            "Fatiar o frango e colocar por cima.",
            "Temperar com azeite e limão.",
        ],
        is_premium: false,
    },
    Recipe {
        id: "3",
        title: "Wrap de Atum Express",
        category: RecipeCategory::Quick,
        time: "5 min",
        calories: 380,
        macros: RecipeMacros { protein: 30, carbs: 35, fat: 10 },
        ingredients: &["Tortilha integral", "Lata de atum ao natural", "Alface", "Milho", "Iogurte grego"],
        steps: &[
            "Escorrer o atum.",
            "Misturar com iogurte e milho.",
            "Espalhar na tortilha com alface.",
            "Enrolar e servir.",
        ],
        is_premium: false,
    },
    Recipe {
        id: "4",
        title: "Salmão Grelhado com Espargos",
        category: RecipeCategory::Dinner,
        time: "15 min",
        calories: 420,
        macros: RecipeMacros { protein: 32, carbs: 5, fat: 28 },
        ingredients: &["Lombo de salmão", "Espargos", "Limão", "Alho"],
        steps: &[
            "Temperar salmão com limão e alho.",
            "Grelhar 4 min de cada lado.",
            "Saltear espargos na mesma frigideira.",
        ],
        is_premium: true,
    },
    Recipe {
        id: "5",
        title: "Panquecas de Proteína de Banana",
        category: RecipeCategory::Breakfast,
        time: "15 min",
        calories: 350,
        macros: RecipeMacros { protein: 25, carbs: 40, fat: 10 },
        ingredients: &["Banana", "Ovos", "Proteína em pó (opcional)", "Aveia"],
        steps: &[
            "Esmagar banana.",
            "Misturar ovos e aveia.",
            "Cozinhar em frigideira antiaderente.",
        ],
        is_premium: true,
    },
    Recipe {
        id: "6",
        title: "Omelete de Claras e Vegetais",
        category: RecipeCategory::Budget,
        time: "10 min",
        calories: 200,
        macros: RecipeMacros { protein: 20, carbs: 5, fat: 8 },
        ingredients: &["Claras de ovo", "Espinafres", "Cogumelos", "Tomate"],
        steps: &["Saltear vegetais.", "Adicionar claras batidas.", "Cozinhar até firmar."],
        is_premium: false,
    },
    Recipe {
        id: "18",
        title: "Maçã com Canela e Manteiga de Amendoim",
        category: RecipeCategory::Snack,
        time: "3 min",
        calories: 210,
        macros: RecipeMacros { protein: 5, carbs: 22, fat: 12 },
        ingredients: &["1 Maçã", "1 c.sopa Manteiga de Amendoim", "Canela em pó"],
        steps: &[
            "Corte a maçã em fatias.",
            "Disponha num prato.",
            "Coloque a manteiga de amendoim por cima ou ao lado.",
            "Polvilhe com canela.",
        ],
        is_premium: false,
    },
    Recipe {
        id: "19",
        title: "Cuscuz de Atum e Milho",
        category: RecipeCategory::Quick,
        time: "7 min",
        calories: 390,
        macros: RecipeMacros { protein: 26, carbs: 45, fat: 10 },
        ingredients: &["1/2 chávena Cuscuz", "1 lata Atum ao natural", "Milho", "Azeite"],
        steps: &[
            "Coloque o cuscuz numa taça com água a ferver.",
            "Tape e deixe hidratar 5 min.",
            "Solte com um garfo.",
            "Misture o atum e o milho.",
            "Tempere com azeite.",
        ],
        is_premium: false,
    },
];

pub fn find(id: &str) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.id == id)
}
