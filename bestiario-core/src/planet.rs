//! Planets and battlefields.
//!
//! Planets are the stages for universal events; battlefields are the
//! arenas for wagered combat. Both ship with built-in rosters, and the
//! chronicler can mint entirely new planets on demand.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Population split across five age bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Demographics {
    pub infants: u64,
    pub children: u64,
    pub adolescents: u64,
    pub adults: u64,
    pub elderly: u64,
}

impl Demographics {
    pub fn empty() -> Self {
        Self {
            infants: 0,
            children: 0,
            adolescents: 0,
            adults: 0,
            elderly: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.infants + self.children + self.adolescents + self.adults + self.elderly
    }
}

/// Overall condition of a planet's civilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum PlanetStatus {
    #[default]
    #[serde(rename = "Estable")]
    Estable,
    #[serde(rename = "En Pánico")]
    EnPanico,
    #[serde(rename = "Bajo Asedio")]
    BajoAsedio,
    #[serde(rename = "Crisis Humanitaria")]
    CrisisHumanitaria,
    #[serde(rename = "Ley Marcial Global")]
    LeyMarcialGlobal,
    #[serde(rename = "Colapso Climático")]
    ColapsoClimatico,
    #[serde(rename = "Colapsado")]
    Colapsado,
    #[serde(rename = "Aniquilado")]
    Aniquilado,
}

impl PlanetStatus {
    pub fn name(&self) -> &'static str {
        match self {
            PlanetStatus::Estable => "Estable",
            PlanetStatus::EnPanico => "En Pánico",
            PlanetStatus::BajoAsedio => "Bajo Asedio",
            PlanetStatus::CrisisHumanitaria => "Crisis Humanitaria",
            PlanetStatus::LeyMarcialGlobal => "Ley Marcial Global",
            PlanetStatus::ColapsoClimatico => "Colapso Climático",
            PlanetStatus::Colapsado => "Colapsado",
            PlanetStatus::Aniquilado => "Aniquilado",
        }
    }
}

impl fmt::Display for PlanetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The full state of a planet, replaced wholesale every saga turn.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanetState {
    #[schemars(description = "El nombre del planeta.")]
    pub name: String,
    #[schemars(description = "La población total actual del planeta.")]
    pub population: u64,
    #[schemars(description = "La población que tenía el planeta al comenzar el evento.")]
    pub initial_population: u64,
    #[schemars(description = "El reparto de la población por franjas de edad.")]
    pub demographics: Demographics,
    #[schemars(description = "El nivel de devastación del planeta (0-100).")]
    pub devastation_level: u8,
    #[schemars(description = "Una descripción del planeta y su característica definitoria.")]
    pub description: String,
    #[schemars(description = "El estado general de la civilización del planeta.")]
    pub status: PlanetStatus,
}

impl PlanetState {
    pub fn is_annihilated(&self) -> bool {
        self.population == 0 && self.initial_population > 0
    }

    /// Fraction of the original population still alive, in [0, 1].
    pub fn survival_ratio(&self) -> f64 {
        if self.initial_population == 0 {
            1.0
        } else {
            self.population as f64 / self.initial_population as f64
        }
    }
}

/// An arena for wagered combat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battlefield {
    pub name: String,
    pub description: String,
}

impl Battlefield {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    /// Pick one of the built-in battlefields uniformly at random.
    pub fn random() -> Battlefield {
        BATTLEFIELDS
            .choose(&mut rand::thread_rng())
            .expect("battlefield roster is never empty")
            .clone()
    }
}

lazy_static! {
    /// The six built-in arenas.
    pub static ref BATTLEFIELDS: Vec<Battlefield> = vec![
        Battlefield::new(
            "Jungla Frondosa",
            "Un entorno denso y húmedo con árboles altos, lianas y poca visibilidad. \
             Favorece la agilidad, el sigilo y a las criaturas adaptadas a la vegetación.",
        ),
        Battlefield::new(
            "Desierto Volcánico",
            "Un paisaje árido de ceniza y roca afilada, con ríos de lava y aire caliente \
             y sulfuroso. Ideal para criaturas de fuego o resistentes al calor. \
             Perjudicial para las de hielo o agua.",
        ),
        Battlefield::new(
            "Tundra Congelada",
            "Una vasta llanura de nieve y hielo, con vientos helados constantes. Las \
             criaturas de hielo tienen ventaja. El frío extremo puede ralentizar a las demás.",
        ),
        Battlefield::new(
            "Pantano Nocivo",
            "Aguas estancadas, terreno fangoso y miasmas tóxicas en el aire. Las criaturas \
             anfibias, de veneno o con alta resistencia se desenvuelven bien. El movimiento \
             es difícil.",
        ),
        Battlefield::new(
            "Ruinas Arcanas",
            "Los restos de una ciudad mágica flotante. Hay fragmentos de energía mágica \
             inestable en el aire y estructuras rotas que ofrecen cobertura. Favorece a \
             criaturas inteligentes o mágicas.",
        ),
        Battlefield::new(
            "Planeta sin Atmósfera",
            "Superficie de un planetoide rocoso en el vacío. No hay aire, ni sonido. La \
             gravedad es baja. Solo criaturas que no necesitan respirar o están adaptadas \
             al vacío pueden sobrevivir.",
        ),
    ];

    /// Built-in destination planets.
    pub static ref PLANETS: Vec<PlanetState> = vec![
        PlanetState {
            name: "Tierra".to_string(),
            population: 7_800_000_000,
            initial_population: 7_800_000_000,
            demographics: Demographics {
                infants: 1_000_000_000,
                children: 1_500_000_000,
                adolescents: 1_200_000_000,
                adults: 3_000_000_000,
                elderly: 1_100_000_000,
            },
            devastation_level: 0,
            description: "Un planeta de tipo terrestre con una civilización tecnológica de \
                          nivel medio-alto, ecosistemas diversos y una población masiva \
                          concentrada en megaciudades."
                .to_string(),
            status: PlanetStatus::Estable,
        },
        PlanetState {
            name: "Marte".to_string(),
            population: 0,
            initial_population: 0,
            demographics: Demographics::empty(),
            devastation_level: 0,
            description: "Un planeta desértico y frío con una atmósfera delgada de dióxido \
                          de carbono. La superficie está cubierta de óxido de hierro, dándole \
                          su característico color rojo. Sin vida conocida."
                .to_string(),
            status: PlanetStatus::Estable,
        },
        PlanetState {
            name: "Venus".to_string(),
            population: 0,
            initial_population: 0,
            demographics: Demographics::empty(),
            devastation_level: 0,
            description: "Un infierno tóxico. Su atmósfera es densa y está compuesta de \
                          dióxido de carbono con nubes de ácido sulfúrico. La presión en la \
                          superficie es 90 veces la de la Tierra y la temperatura promedio \
                          es de 465°C."
                .to_string(),
            status: PlanetStatus::Estable,
        },
        PlanetState {
            name: "Europa (luna de Júpiter)".to_string(),
            population: 0,
            initial_population: 0,
            demographics: Demographics::empty(),
            devastation_level: 0,
            description: "Una luna helada con una superficie de hielo de agua, pero con un \
                          vasto océano de agua líquida debajo. Es el lugar más prometedor \
                          para encontrar vida extraterrestre. La superficie es bombardeada \
                          por la radiación de Júpiter."
                .to_string(),
            status: PlanetStatus::Estable,
        },
    ];
}

/// Look up a built-in planet by name.
pub fn find_planet(name: &str) -> Option<&'static PlanetState> {
    PLANETS.iter().find(|p| p.name == name)
}
