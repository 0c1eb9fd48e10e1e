//! Seeded synthetic admission data.
//!
//! Stands in for the live sources when they are unreachable and gives
//! tests reproducible fixtures. The same seed always yields the same
//! dataset; there is no global generator state.

use crate::domain::model::{
    GenderRatios, ProgramYearRecord, RawGenderScope, Region, RegionObservation, University,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const FIRST_YEAR: i32 = 2010;
pub const LAST_YEAR: i32 = 2023;

/// Yearly shift of the gender ratios toward parity.
pub const GENDER_DRIFT_PER_YEAR: f64 = 0.005;

const UNIVERSITIES: [(&str, &str); 5] = [
    ("kth", "Kungliga Tekniska Högskolan"),
    ("su", "Stockholms Universitet"),
    ("uu", "Uppsala Universitet"),
    ("lu", "Lunds Universitet"),
    ("gu", "Göteborgs Universitet"),
];

const REGIONS: [(&str, &str); 21] = [
    ("stockholm", "Stockholm"),
    ("uppsala", "Uppsala"),
    ("skane", "Skåne"),
    ("vastra_gotaland", "Västra Götaland"),
    ("ostergotland", "Östergötland"),
    ("norrbotten", "Norrbotten"),
    ("vasterbotten", "Västerbotten"),
    ("jamtland", "Jämtland"),
    ("dalarna", "Dalarna"),
    ("orebro", "Örebro"),
    ("vastmanland", "Västmanland"),
    ("sodermanland", "Södermanland"),
    ("gavleborg", "Gävleborg"),
    ("varmland", "Värmland"),
    ("jonkoping", "Jönköping"),
    ("kalmar", "Kalmar"),
    ("kronoberg", "Kronoberg"),
    ("blekinge", "Blekinge"),
    ("halland", "Halland"),
    ("gotland", "Gotland"),
    ("vasternorrland", "Västernorrland"),
];

struct ProgramTemplate {
    suffix: &'static str,
    name: &'static str,
    bias: GenderRatios,
}

const PROGRAMS: [ProgramTemplate; 3] = [
    ProgramTemplate {
        suffix: "cs",
        name: "Datavetenskap",
        bias: GenderRatios { male: 0.75, female: 0.23, other: 0.02 },
    },
    ProgramTemplate {
        suffix: "eng",
        name: "Civilingenjör",
        bias: GenderRatios { male: 0.65, female: 0.33, other: 0.02 },
    },
    ProgramTemplate {
        suffix: "med",
        name: "Läkarprogrammet",
        bias: GenderRatios { male: 0.35, female: 0.63, other: 0.02 },
    },
];

const UNIVERSITY_BIAS: GenderRatios = GenderRatios { male: 0.55, female: 0.43, other: 0.02 };

fn nearby_regions(university_id: &str) -> &'static [&'static str] {
    match university_id {
        "kth" | "su" => &["stockholm", "uppsala", "sodermanland"],
        "uu" => &["uppsala", "stockholm", "vastmanland"],
        "lu" => &["skane", "blekinge", "halland"],
        "gu" => &["vastra_gotaland", "halland", "varmland"],
        _ => &[],
    }
}

/// In-memory admission data, either generated or assembled by hand.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub universities: Vec<University>,
    pub regions: Vec<Region>,
    pub programs: Vec<ProgramYearRecord>,
    pub region_observations: Vec<RegionObservation>,
    pub gender_scopes: Vec<RawGenderScope>,
}

impl Dataset {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let universities = UNIVERSITIES
            .iter()
            .map(|(id, name)| University {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect::<Vec<_>>();
        let regions = REGIONS
            .iter()
            .map(|(id, name)| Region {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect::<Vec<_>>();

        let mut dataset = Dataset {
            universities,
            regions,
            ..Dataset::default()
        };

        for university in &UNIVERSITIES {
            let university_id = university.0;
            for year in FIRST_YEAR..=LAST_YEAR {
                for program in &PROGRAMS {
                    dataset
                        .programs
                        .push(program_record(&mut rng, university_id, program, year));
                }
                dataset
                    .region_observations
                    .extend(region_observations(&mut rng, university_id, year));
                dataset
                    .gender_scopes
                    .extend(gender_scopes(&mut rng, university_id, year));
            }
        }

        dataset
    }
}

fn years_since_start(year: i32) -> i64 {
    i64::from(year - FIRST_YEAR)
}

fn program_record(
    rng: &mut StdRng,
    university_id: &str,
    program: &ProgramTemplate,
    year: i32,
) -> ProgramYearRecord {
    let base = 500 + rng.random_range(0..500i64);
    let trend = years_since_start(year) * 50;
    let noise = rng.random_range(-100..100i64);
    let applicants = (base + trend + noise).max(0) as u64;

    let acceptance = 0.1 + rng.random::<f64>() * 0.2;
    let first_hand = 0.4 + rng.random::<f64>() * 0.3;

    ProgramYearRecord {
        program_id: format!("{}-{}-{}", university_id, program.suffix, year),
        program_name: program.name.to_string(),
        university_id: university_id.to_string(),
        year,
        applicants,
        accepted_students: (applicants as f64 * acceptance).floor() as u64,
        first_hand_applicants: (applicants as f64 * first_hand).floor() as u64,
    }
}

fn region_observations(rng: &mut StdRng, university_id: &str, year: i32) -> Vec<RegionObservation> {
    let nearby = nearby_regions(university_id);
    let yearly_applicants = 1000 + rng.random_range(0..2000u64);

    REGIONS
        .iter()
        .map(|(region_id, region_name)| {
            // Provisional percentage, deliberately not summing to 100.
            let raw_share = if nearby.contains(region_id) {
                10.0 + rng.random::<f64>() * 15.0
            } else {
                1.0 + rng.random::<f64>() * 4.0
            };

            RegionObservation {
                university_id: university_id.to_string(),
                year,
                region_id: region_id.to_string(),
                region_name: region_name.to_string(),
                applicant_count: (raw_share / 100.0 * yearly_applicants as f64).floor() as u64,
                raw_share,
            }
        })
        .collect()
}

/// Shifts `bias` toward parity by the yearly drift. The result is left
/// unnormalized.
pub fn drift_toward_parity(bias: GenderRatios, year: i32) -> GenderRatios {
    let drift = years_since_start(year) as f64 * GENDER_DRIFT_PER_YEAR;
    let male = if bias.male > 0.5 { bias.male - drift } else { bias.male + drift };
    let female = if bias.female < 0.5 { bias.female + drift } else { bias.female - drift };
    GenderRatios::new(male.max(0.0), female.max(0.0), bias.other)
}

fn gender_scopes(rng: &mut StdRng, university_id: &str, year: i32) -> Vec<RawGenderScope> {
    let elapsed = years_since_start(year) as u64;
    let mut scopes = Vec::with_capacity(PROGRAMS.len() + 1);

    let total_applicants = 1500 + rng.random_range(0..1000u64) + elapsed * 100;
    let acceptance = 0.2 + rng.random::<f64>() * 0.1;
    scopes.push(RawGenderScope {
        university_id: university_id.to_string(),
        year,
        program_id: None,
        program_name: None,
        ratios: drift_toward_parity(UNIVERSITY_BIAS, year),
        total_applicants,
        total_accepted: (total_applicants as f64 * acceptance).floor() as u64,
    });

    for program in &PROGRAMS {
        let applicants = 400 + rng.random_range(0..300u64) + elapsed * 30;
        let acceptance = 0.15 + rng.random::<f64>() * 0.15;
        scopes.push(RawGenderScope {
            university_id: university_id.to_string(),
            year,
            program_id: Some(format!("{}-{}", university_id, program.suffix)),
            program_name: Some(program.name.to_string()),
            ratios: drift_toward_parity(program.bias, year),
            total_applicants: applicants,
            total_accepted: (applicants as f64 * acceptance).floor() as u64,
        });
    }

    scopes
}
