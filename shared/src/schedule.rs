//! Fertilizer application scheduling
//!
//! Each recommendation is expanded into dated field applications according to
//! its [`FertilizerKind`]: nitrogen follows the crop's growth-stage split,
//! phosphate goes in at planting, potash is split between planting and the
//! reproductive stage, and organic material is worked in three weeks ahead.

use chrono::{Duration, NaiveDate};

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::{
    ApplicationMethod, ApplicationScheduleEntry, CropProfile, FertilizerKind, FertilizerRecommendation,
    REPRODUCTIVE_STAGE,
};
use crate::reference::ReferenceData;

/// Organic material goes down this many days before planting
pub const PRE_PLANTING_DAYS: i64 = -21;

const NITROGEN_WEATHER: [&str; 2] = ["Avoid application before heavy rain", "Apply in cool hours"];
const BASAL_WEATHER: [&str; 2] = ["Apply at planting", "Mix with soil"];
const REPRODUCTIVE_WEATHER: [&str; 2] = ["Apply during flower initiation", "Irrigate after application"];
const ORGANIC_WEATHER: [&str; 2] = ["Apply 2-3 weeks before planting", "Incorporate well into soil"];

/// Build a dated application schedule for a crop.
///
/// Entries are ordered by days after planting; pre-planting applications come
/// first and entries on the same day keep the order of the recommendations.
pub fn build_application_schedule(
    reference: &ReferenceData,
    crop_id: &str,
    recommendations: &[FertilizerRecommendation],
    planting_date: NaiveDate,
) -> AgronomyResult<Vec<ApplicationScheduleEntry>> {
    let crop = reference.crop(crop_id)?;
    let planner = Planner { crop, planting_date };

    let mut schedule = Vec::new();
    for rec in recommendations {
        match rec.kind {
            FertilizerKind::Nitrogenous => {
                for stage in crop.growth_stages.iter().filter(|s| s.fraction > 0.0) {
                    schedule.push(planner.entry(
                        rec,
                        &stage.name,
                        crop.day_offset(&stage.name),
                        rec.amount_kg_per_ha * stage.fraction,
                        ApplicationMethod::Broadcast,
                        &NITROGEN_WEATHER,
                    )?);
                }
            }
            FertilizerKind::Phosphatic => {
                schedule.push(planner.entry(
                    rec,
                    "basal",
                    0,
                    rec.amount_kg_per_ha,
                    ApplicationMethod::Band,
                    &BASAL_WEATHER,
                )?);
            }
            FertilizerKind::Potassic => {
                let half = rec.amount_kg_per_ha * 0.5;
                schedule.push(planner.entry(rec, "basal", 0, half, ApplicationMethod::Broadcast, &BASAL_WEATHER)?);
                schedule.push(planner.entry(
                    rec,
                    REPRODUCTIVE_STAGE,
                    crop.reproductive_day(),
                    half,
                    ApplicationMethod::Broadcast,
                    &REPRODUCTIVE_WEATHER,
                )?);
            }
            FertilizerKind::Organic => {
                schedule.push(planner.entry(
                    rec,
                    "pre_planting",
                    PRE_PLANTING_DAYS,
                    rec.amount_kg_per_ha,
                    ApplicationMethod::Broadcast,
                    &ORGANIC_WEATHER,
                )?);
            }
        }
    }

    schedule.sort_by_key(|entry| entry.days_after_planting);
    Ok(schedule)
}

struct Planner<'a> {
    crop: &'a CropProfile,
    planting_date: NaiveDate,
}

impl Planner<'_> {
    fn entry(
        &self,
        rec: &FertilizerRecommendation,
        stage: &str,
        days_after_planting: i64,
        amount: f64,
        method: ApplicationMethod,
        weather: &[&str],
    ) -> AgronomyResult<ApplicationScheduleEntry> {
        let application_date = self
            .planting_date
            .checked_add_signed(Duration::days(days_after_planting))
            .ok_or_else(|| {
                AgronomyError::parameter(
                    "planting_date",
                    format!("{} stage for {} falls outside the calendar", stage, self.crop.id),
                )
            })?;

        Ok(ApplicationScheduleEntry {
            stage: stage.to_string(),
            days_after_planting,
            application_date,
            nutrient: rec.kind.applied_nutrient(),
            amount,
            fertilizer: rec.fertilizer.clone(),
            kind: rec.kind,
            method,
            weather_conditions: weather.iter().map(|w| w.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppliedNutrient, NutrientDeficit};
    use crate::recommendation::recommend_fertilizers;

    fn planting() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn rec(data: &ReferenceData, id: &str, amount: f64) -> FertilizerRecommendation {
        FertilizerRecommendation::from_product(data.fertilizer(id).unwrap(), amount)
    }

    #[test]
    fn urea_follows_rice_growth_stages() {
        let data = ReferenceData::builtin();
        let schedule = build_application_schedule(&data, "rice", &[rec(&data, "urea", 100.0)], planting()).unwrap();

        let stages: Vec<_> = schedule.iter().map(|e| (e.stage.as_str(), e.days_after_planting)).collect();
        // grain_filling carries no nitrogen and is skipped
        assert_eq!(stages, vec![("basal", 0), ("tillering", 21), ("panicle", 45)]);
        let amounts: Vec<f64> = schedule.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![25.0, 50.0, 25.0]);
        assert!(schedule.iter().all(|e| e.nutrient == AppliedNutrient::Nitrogen));
        assert!(schedule.iter().all(|e| e.method == ApplicationMethod::Broadcast));
    }

    #[test]
    fn phosphate_is_single_basal_band() {
        let data = ReferenceData::builtin();
        let schedule = build_application_schedule(&data, "wheat", &[rec(&data, "ssp", 80.0)], planting()).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].stage, "basal");
        assert_eq!(schedule[0].days_after_planting, 0);
        assert_eq!(schedule[0].method, ApplicationMethod::Band);
        assert_eq!(schedule[0].application_date, planting());
    }

    #[test]
    fn potash_split_at_reproductive_stage() {
        let data = ReferenceData::builtin();
        let schedule = build_application_schedule(&data, "cotton", &[rec(&data, "mop", 60.0)], planting()).unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].amount, 30.0);
        assert_eq!(schedule[1].stage, "reproductive");
        assert_eq!(schedule[1].days_after_planting, 75);
        assert_eq!(schedule[1].application_date, NaiveDate::from_ymd_opt(2025, 8, 29).unwrap());
        assert_eq!(schedule[1].weather_conditions[0], "Apply during flower initiation");
    }

    #[test]
    fn organic_goes_down_three_weeks_early() {
        let data = ReferenceData::builtin();
        let program = vec![rec(&data, "urea", 50.0), rec(&data, "compost", 5000.0)];
        let schedule = build_application_schedule(&data, "maize", &program, planting()).unwrap();

        assert_eq!(schedule[0].stage, "pre_planting");
        assert_eq!(schedule[0].days_after_planting, -21);
        assert_eq!(schedule[0].application_date, NaiveDate::from_ymd_opt(2025, 5, 25).unwrap());
        assert_eq!(schedule[0].nutrient, AppliedNutrient::OrganicMatter);
    }

    #[test]
    fn complexes_schedule_by_catalog_kind() {
        let data = ReferenceData::builtin();
        let program = vec![rec(&data, "npk_10_26_26", 100.0), rec(&data, "npk_20_20_0_13", 100.0)];
        let schedule = build_application_schedule(&data, "rice", &program, planting()).unwrap();

        let balanced: Vec<_> = schedule.iter().filter(|e| e.fertilizer == "NPK 10-26-26").collect();
        assert_eq!(balanced.len(), 1);
        assert_eq!(balanced[0].method, ApplicationMethod::Band);

        let sulphur_grade = schedule.iter().filter(|e| e.fertilizer == "NPK 20-20-0-13S").count();
        assert_eq!(sulphur_grade, 3);
    }

    #[test]
    fn entries_sorted_with_stable_ties() {
        let data = ReferenceData::builtin();
        let deficit = NutrientDeficit::new(60.0, 40.0, 30.0);
        let program = recommend_fertilizers(&data, &deficit, None, false).unwrap();
        let schedule = build_application_schedule(&data, "rice", &program, planting()).unwrap();

        assert!(schedule.windows(2).all(|w| w[0].days_after_planting <= w[1].days_after_planting));
        let day_zero: Vec<_> = schedule
            .iter()
            .filter(|e| e.days_after_planting == 0)
            .map(|e| e.fertilizer.as_str())
            .collect();
        assert_eq!(day_zero, vec!["DAP", "Urea", "Muriate of Potash"]);
    }

    #[test]
    fn crop_without_timings_uses_generic_offsets() {
        let mut data = ReferenceData::builtin();
        for crop in data.crops.iter_mut().filter(|c| c.id == "potato") {
            crop.application_timings = None;
        }
        let schedule = build_application_schedule(&data, "potato", &[rec(&data, "mop", 40.0)], planting()).unwrap();
        assert_eq!(schedule[1].days_after_planting, 60);
    }

    #[test]
    fn unknown_crop_fails() {
        let data = ReferenceData::builtin();
        let err = build_application_schedule(&data, "quinoa", &[], planting()).unwrap_err();
        assert_eq!(err, AgronomyError::UnknownCrop("quinoa".to_string()));
    }
}
