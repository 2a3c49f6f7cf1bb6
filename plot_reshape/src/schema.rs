//! The column tables of the survey instrument.
//!
//! These lists are the contract with the data collection form. When the form
//! changes, add a new schema version next to `survey_v1` rather than editing
//! the constants in place.

use std::collections::HashSet;

pub const SURVEY_V1: &str = "survey-v1";

/// The stem whose indexed columns decide which plots exist in a submission.
pub const PLOT_ID_STEM: &str = "this_plot_id";

/// Columns copied as-is into every output row.
pub const STATIC_COLUMNS: &[&str] = &[
    "submissiondate",
    "q1_enum_name",
    "calc_date",
    "calc_start_time",
    "village_name",
    "farmer_id",
    "farmer_name",
    "phone_number",
    "total_acres",
    "plots",
    "sowing_date",
    "transplant_date",
    "harvest_date",
    "no_of_plots",
    "name_cnf",
    "phone_reenter",
    "alt_phone",
    "b4_plot_serials",
    "total_plots",
    "first_visit",
    "a1_sowing_cnf",
    "a2a_sw_date",
    "a2b_sw_date",
    "a3_dsr",
    "a4_dsr_type",
    "a7_seed",
    "a7_seed_oth",
    "a8_duration",
    "a9_training",
    "b1_area_cnf",
    "b2_area_enter",
    "b2_area_enter_1",
    "b2_area_enter_2",
    "b2_enter_acres",
    "b2_enter_guntas",
    "b3_plots_cnf",
    "d10_window",
    "d11_window_end",
    "d12_rain",
    "d13_tillering",
    "d14_uneven",
    "fertilizer_date",
    "e1_window",
    "e2_dw_date",
    "e3_dw_number",
    "e4_fruits_id",
    "comments",
    "instanceid",
    "formdef_version",
    "key",
    "date_only",
    "date_num",
    "dup_flag",
    "visit_gap",
    "daily_unique_farmers",
    "depth",
    "drying_event",
];

/// Plot identification and location stems (`<stem>_<plot index>` in the export).
pub const SLASH_PATTERN_STEMS: &[&str] = &[
    "this_plot_id",
    "this_plot_label1",
    "w3w_link",
    "w3w_latlong",
    "to_be_updated",
    "message",
    "w3w_okay",
    "new_plot_entr",
    "new_w3w_link",
    "scto_lat",
    "scto_lon",
    "scto_alt",
    "scto_acc",
    "final_w3w_link",
    "w3w_corrected",
];

/// Pipe and water level monitoring stems (`<stem>_<plot index>` in the export).
pub const PIPE_PATTERN_STEMS: &[&str] = &[
    "this_plot_id2",
    "this_plot_label2",
    "b8a_plot_awd",
    "b8b_plot_dsr",
    "b9_field_dsr_indi",
    "b9_field_dsr_indi_1",
    "b9_field_dsr_indi_2",
    "b9_field_dsr_indi_3",
    "b9_field_dsr_indi_4",
    "b9_field_dsr_indi__996",
    "b9_oth",
    "awd_plot",
    "dsr_plot",
    "c1_pipe_status",
    "c2_pipe_distance",
    "pipe_image",
    "d1_soil",
    "d2_soil_removal",
    "d3_wl_status",
    "d4_wl_above",
    "d5_wl_below",
    "d5_pipe_image",
    "d6_pipeslatitude",
    "d6_pipeslongitude",
    "d6_pipesaltitude",
    "d6_pipesaccuracy",
    "d8_puddles",
    "d9_cracks",
];

/// The complete output schema handed to the reshaper.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnSchema {
    pub version: String,
    /// Stem of the plot identifier column, used to discover and select plots.
    pub index_stem: String,
    pub static_columns: Vec<String>,
    pub slash_pattern_stems: Vec<String>,
    pub pipe_pattern_stems: Vec<String>,
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl ColumnSchema {
    pub fn new(
        version: &str,
        index_stem: &str,
        static_columns: &[&str],
        slash_pattern_stems: &[&str],
        pipe_pattern_stems: &[&str],
    ) -> ColumnSchema {
        ColumnSchema {
            version: version.to_string(),
            index_stem: index_stem.to_string(),
            static_columns: to_strings(static_columns),
            slash_pattern_stems: to_strings(slash_pattern_stems),
            pipe_pattern_stems: to_strings(pipe_pattern_stems),
        }
    }

    pub fn survey_v1() -> ColumnSchema {
        ColumnSchema::new(
            SURVEY_V1,
            PLOT_ID_STEM,
            STATIC_COLUMNS,
            SLASH_PATTERN_STEMS,
            PIPE_PATTERN_STEMS,
        )
    }

    /// All the repeating stems: the slash group first, then the pipe group.
    pub fn repeating_stems(&self) -> impl Iterator<Item = &String> {
        self.slash_pattern_stems
            .iter()
            .chain(self.pipe_pattern_stems.iter())
    }

    /// The header of the long table. A name listed more than once only
    /// appears at its first position.
    pub fn output_columns(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.static_columns
            .iter()
            .chain(self.repeating_stems())
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    /// Names that occur more than once across the three lists.
    /// The reshaper keeps the last write for those, which is rarely what the
    /// form designer intended.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut dups: Vec<String> = Vec::new();
        for name in self.static_columns.iter().chain(self.repeating_stems()) {
            if !seen.insert(name.as_str()) && !dups.contains(name) {
                dups.push(name.clone());
            }
        }
        dups
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        ColumnSchema::survey_v1()
    }
}
