//! Built-in field table for reinforced-concrete frames with masonry infill.
//!
//! Two aligned tables: [`RC_FRAME_FIELDS`] describes every field and
//! [`RC_FRAME_DEFAULTS`] gives the value a record carries when the field was
//! never supplied. [`FieldSchema::new`](super::FieldSchema::new) checks that
//! they cover exactly the same fields.
//!
//! All lengths default to millimetres, stresses and moduli to MPa/GPa,
//! densities to kg/m^3.

use crate::units::UnitFamily;

use super::{DefaultValue, FieldSpec};

const REFERENCE: &str = "reference";
const FRAME_GEOMETRY: &str = "frame_geometry";
const INFILL_GEOMETRY: &str = "infill_geometry";
const REINFORCEMENT_DETAILS: &str = "reinforcement_details";
const CONCRETE_PROPERTIES: &str = "concrete_properties";
const STEEL_PROPERTIES: &str = "steel_properties";
const INFILL_MECHANICAL_PROPERTIES: &str = "infill_mechanical_properties";
const LOADING: &str = "loading";
const RESPONSE: &str = "response";
const RETROFIT: &str = "retrofit";
const COMMENTS: &str = "comments";

/// Field descriptors, in declaration (and therefore record) order.
pub(crate) const RC_FRAME_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("specimen_id", REFERENCE, "", "The name of the specimen defined in the manuscript"),
    FieldSpec::real("specimen_scale", REFERENCE, "", "The scale of the specimen defined in the manuscript (1, 0.5, 0.1, ... etc)"),
    FieldSpec::text("source", REFERENCE, "", "Site for reference source (webpage or doi)"),
    FieldSpec::text("title", REFERENCE, "", "Title of the reference source"),
    FieldSpec::text("authors", REFERENCE, "", "List of authors for the reference source (comma-separated string)"),
    FieldSpec::integer("year", REFERENCE, "", "Publication year of the reference source"),

    // frame geometry
    FieldSpec::length("frm_h", FRAME_GEOMETRY, "", "Height of the frame calculated from the top surface of the base_beam to the top surface of the top_beam. (also known as floor to floor height)"),
    FieldSpec::length("frm_l", FRAME_GEOMETRY, "", "Length of the frame calculated from the external surfaces of the columns."),
    FieldSpec::length("col_h", FRAME_GEOMETRY, "column_rectangle_cross_section", "Column dimension parallel to frame plane"),
    FieldSpec::length("col_d", FRAME_GEOMETRY, "column_rectangle_cross_section", "Column dimension perpendicular to frame plane"),
    FieldSpec::length("bm_h", FRAME_GEOMETRY, "beam_rectangle_cross_section", "Beam height"),
    FieldSpec::length("bm_t", FRAME_GEOMETRY, "beam_rectangle_cross_section", "Beam thickness"),
    FieldSpec::length("bbm_h", FRAME_GEOMETRY, "base_beam_rectangle_cross_section", "Base_Beam height"),
    FieldSpec::length("bbm_t", FRAME_GEOMETRY, "base_beam_rectangle_cross_section", "Base_Beam thickness"),
    FieldSpec::length("slb_d", FRAME_GEOMETRY, "slab_section", "Slab Depth (dimension perpendicular to frame plane)"),
    FieldSpec::length("slb_h", FRAME_GEOMETRY, "slab_section", "Slab height (dimension parallel to frame plane)"),
    FieldSpec::length("col_ext", FRAME_GEOMETRY, "extensions", "Column extension above Beam top surface"),
    FieldSpec::length("bm_ext", FRAME_GEOMETRY, "extensions", "Beam extension outside the external surfaces of the columns"),
    FieldSpec::length("bbm_ext", FRAME_GEOMETRY, "extensions", "Base Beam extension outside the external surfaces of the columns"),

    // infill geometry
    FieldSpec::text("inf_type", INFILL_GEOMETRY, "", "1. one_wythe 2. two_wythe 3. none"),
    FieldSpec::text("inf_opn_type", INFILL_GEOMETRY, "openings", "1. window 2. door 3. mix 4. none"),
    FieldSpec::length("inf_win_h", INFILL_GEOMETRY, "openings", "Window horizontal dimension (length)"),
    FieldSpec::length("inf_win_v", INFILL_GEOMETRY, "openings", "Window vertical dimension (height)"),
    FieldSpec::length("inf_win_ph", INFILL_GEOMETRY, "openings", "Window horizontal position from main reference point"),
    FieldSpec::length("inf_win_pv", INFILL_GEOMETRY, "openings", "Window vertical position from main reference point"),
    FieldSpec::length("inf_door_h", INFILL_GEOMETRY, "openings", "Door horizontal dimension (length)"),
    FieldSpec::length("inf_door_v", INFILL_GEOMETRY, "openings", "Door vertical dimension (height)"),
    FieldSpec::length("inf_door_ph", INFILL_GEOMETRY, "openings", "Door horizontal position from main reference point"),
    FieldSpec::length("inf_door_pv", INFILL_GEOMETRY, "openings", "Door vertical position from main reference point"),
    FieldSpec::length("inf_dp", INFILL_GEOMETRY, "first_wythe", "Infill depth from the main reference point"),
    FieldSpec::text("inf_bnd_pat", INFILL_GEOMETRY, "first_wythe", "Infill bond pattern 1. running 2. stack"),
    FieldSpec::text("inf_inff_intfc", INFILL_GEOMETRY, "interface_information", "Infill infill frame interface condition info 1. mortar_bond 2. seismic_joint 3. dowels 4. gap"),
    FieldSpec::length("inf_interface_bottom", INFILL_GEOMETRY, "interface_information", "Infill interface fill/gap dimension at bottom"),
    FieldSpec::length("inf_interface_left", INFILL_GEOMETRY, "interface_information", "Infill interface fill/gap dimension at left"),
    FieldSpec::length("inf_interface_top", INFILL_GEOMETRY, "interface_information", "Infill interface fill/gap dimension at top"),
    FieldSpec::length("inf_interface_right", INFILL_GEOMETRY, "interface_information", "Infill interface fill/gap dimension at right"),
    FieldSpec::length("inf_ul", INFILL_GEOMETRY, "unit_and_joint", "Infill unit length (horizontal)"),
    FieldSpec::length("inf_uh", INFILL_GEOMETRY, "unit_and_joint", "Infill unit height (vertical)"),
    FieldSpec::length("inf_ut", INFILL_GEOMETRY, "unit_and_joint", "Infill unit thickness (depth)"),
    FieldSpec::length("inf_uhead_t", INFILL_GEOMETRY, "unit_and_joint", "Infill head joint thickness (vertical)"),
    FieldSpec::length("inf_ubed_t", INFILL_GEOMETRY, "unit_and_joint", "Infill bed joint thickness (horizontal)"),

    // reinforcement details
    FieldSpec::length("col_cover", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Cover till the external surface of the transverse reinforcement"),
    FieldSpec::notation("col_long_reinf_corner", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column longitudinal reinforcement at corners (e.g., '4#20')"),
    FieldSpec::notation("col_long_reinf_top", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column longitudinal reinforcement at top (e.g., '2#16')"),
    FieldSpec::notation("col_long_reinf_mid", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column longitudinal reinforcement at mid-height (e.g., '2#16')"),
    FieldSpec::notation("col_long_reinf_bot", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column longitudinal reinforcement at bottom (e.g., '2#16')"),
    FieldSpec::length("col_trans_crit_top_distance", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column transverse reinforcement critical top region distance"),
    FieldSpec::notation("col_trans_crit_top_reinf", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column transverse reinforcement at critical top region (e.g., '2#8@150')"),
    FieldSpec::length("col_trans_crit_bot_distance", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column transverse reinforcement critical bottom region distance"),
    FieldSpec::notation("col_trans_crit_bot_reinf", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column transverse reinforcement at critical bottom region (e.g., '2#8@150')"),
    FieldSpec::notation("col_trans_mid_reinf", REINFORCEMENT_DETAILS, "column_rectangle_reinforcement", "Column transverse reinforcement at mid-height (e.g., '1#8@250')"),
    FieldSpec::length("bm_cover", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Cover till the external surface of the transverse reinforcement"),
    FieldSpec::notation("bm_long_reinf_corner", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam longitudinal reinforcement at corners (e.g., '2#20')"),
    FieldSpec::notation("bm_long_reinf_top", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam longitudinal reinforcement at top (e.g., '3#16')"),
    FieldSpec::notation("bm_long_reinf_mid", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam longitudinal reinforcement at mid-span (e.g., '2#16')"),
    FieldSpec::notation("bm_long_reinf_bot", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam longitudinal reinforcement at bottom (e.g., '3#20')"),
    FieldSpec::length("bm_trans_crit_left_distance", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam transverse reinforcement critical left region distance"),
    FieldSpec::notation("bm_trans_crit_left_reinf", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam transverse reinforcement at critical left region (e.g., '2#8@100')"),
    FieldSpec::length("bm_trans_crit_right_distance", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam transverse reinforcement critical right region distance"),
    FieldSpec::notation("bm_trans_crit_right_reinf", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam transverse reinforcement at critical right region (e.g., '2#8@100')"),
    FieldSpec::notation("bm_trans_mid_reinf", REINFORCEMENT_DETAILS, "beam_rectangle_reinforcement", "Beam transverse reinforcement at mid-span (e.g., '1#8@200')"),
    FieldSpec::length("bbm_cover", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Cover till the external surface of the transverse reinforcement"),
    FieldSpec::notation("bbm_long_reinf_corner", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam longitudinal reinforcement at corners (e.g., '2#20')"),
    FieldSpec::notation("bbm_long_reinf_top", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam longitudinal reinforcement at top (e.g., '3#16')"),
    FieldSpec::notation("bbm_long_reinf_mid", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam longitudinal reinforcement at mid-span (e.g., '2#16')"),
    FieldSpec::notation("bbm_long_reinf_bot", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam longitudinal reinforcement at bottom (e.g., '3#20')"),
    FieldSpec::length("bbm_trans_crit_left_distance", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam transverse reinforcement critical left region distance"),
    FieldSpec::notation("bbm_trans_crit_left_reinf", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam transverse reinforcement at critical left region (e.g., '2#8@100')"),
    FieldSpec::length("bbm_trans_crit_right_distance", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam transverse reinforcement critical right region distance"),
    FieldSpec::notation("bbm_trans_crit_right_reinf", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam transverse reinforcement at critical right region (e.g., '2#8@100')"),
    FieldSpec::notation("bbm_trans_mid_reinf", REINFORCEMENT_DETAILS, "base_beam_rectangle_reinforcement", "Base_Beam transverse reinforcement at mid-span (e.g., '1#8@200')"),
    FieldSpec::length("slb_cover", REINFORCEMENT_DETAILS, "slab_rectangle_reinforcement", "Slab cover"),
    FieldSpec::notation("slb_top_l_reinf", REINFORCEMENT_DETAILS, "slab_rectangle_reinforcement", "Slab Top reinforcement parallel to frame plane (e.g., '#12@200')"),
    FieldSpec::notation("slb_top_d_reinf", REINFORCEMENT_DETAILS, "slab_rectangle_reinforcement", "Slab Top reinforcement perpendicular to frame plane (e.g., '#12@250')"),
    FieldSpec::notation("slb_bot_l_reinf", REINFORCEMENT_DETAILS, "slab_rectangle_reinforcement", "Slab Bottom reinforcement parallel to frame plane (e.g., '#12@200')"),
    FieldSpec::notation("slb_bot_d_reinf", REINFORCEMENT_DETAILS, "slab_rectangle_reinforcement", "Slab Bottom reinforcement perpendicular to frame plane (e.g., '#12@250')"),

    // concrete properties
    FieldSpec::quantity("fc", CONCRETE_PROPERTIES, "", UnitFamily::Pressure, "MPa", "Concrete compressive strength"),
    FieldSpec::quantity("Ec", CONCRETE_PROPERTIES, "", UnitFamily::Pressure, "GPa", "Concrete modulus of elasticity"),
    FieldSpec::quantity("conc_prop_day", CONCRETE_PROPERTIES, "", UnitFamily::Time, "day", "Concrete properties test age"),
    FieldSpec::quantity("conc_density", CONCRETE_PROPERTIES, "", UnitFamily::Density, "kg/m^3", "Concrete density"),

    // steel properties
    FieldSpec::quantity("fy", STEEL_PROPERTIES, "", UnitFamily::Pressure, "MPa", "Steel yield strength"),
    FieldSpec::quantity("fu", STEEL_PROPERTIES, "", UnitFamily::Pressure, "MPa", "Steel ultimate strength"),
    FieldSpec::quantity("Ey", STEEL_PROPERTIES, "", UnitFamily::Pressure, "GPa", "Steel modulus of elasticity"),
    FieldSpec::quantity("stl_density", STEEL_PROPERTIES, "", UnitFamily::Density, "kg/m^3", "Steel density"),

    // infill mechanical properties
    FieldSpec::quantity("inf_unit_density", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Density, "kg/m^3", "Infill unit density"),
    FieldSpec::quantity("inf_mortar_density", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Density, "kg/m^3", "Infill mortar density"),
    FieldSpec::quantity("inf_unit_compressive_strength_length", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill unit compressive strength parallel to length"),
    FieldSpec::quantity("inf_unit_compressive_strength_height", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill unit compressive strength parallel to height"),
    FieldSpec::quantity("inf_unit_compressive_strength_width", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill unit compressive strength parallel to width"),
    FieldSpec::text("inf_mortar_type", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", "Infill mortar type classification"),
    FieldSpec::quantity("inf_mortar_compressive_strength", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill mortar compressive strength"),
    FieldSpec::quantity("inf_assembly_compressive_strength_height", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill assembly compressive strength in height direction"),
    FieldSpec::quantity("inf_assembly_compressive_strength_diagonal", INFILL_MECHANICAL_PROPERTIES, "infill_mechanical_properties", UnitFamily::Pressure, "MPa", "Infill assembly diagonal compressive strength"),

    // loading
    FieldSpec::text("inp_loading_protocol", LOADING, "loading_in_plane", "In-plane loading protocol. Options. 1. monotonic 2. cyclic 3. none (not_applicable)"),
    FieldSpec::integer("inp_cyclic_number_of_cycles", LOADING, "loading_in_plane", "In-plane number of cycles per amplitude level"),
    FieldSpec::text("inp_cyclic_repetition", LOADING, "loading_in_plane", "In-plane cyclic repetition pattern. Options: 1. constant 2. increasing"),
    FieldSpec::text("inp_cyclic_protocol", LOADING, "loading_in_plane", "In-plane cyclic protocol standard: FEMA461, ACI374, etc OR none (not_applicable)"),
    FieldSpec::quantity("inp_column_vertical_load", LOADING, "loading_in_plane", UnitFamily::ConcentratedForce, "kN", "In-plane column vertical load"),
    FieldSpec::quantity("inp_beam_vertical_load", LOADING, "loading_in_plane", UnitFamily::DistributedForce, "kN/m", "In-plane beam distributed vertical load"),
    FieldSpec::text("oop_loading_protocol", LOADING, "loading_out_of_plane", "Out-of-plane loading protocol. Options: 1. monotonic 2. cyclic 3. none (not_applicable)"),
    FieldSpec::integer("oop_cyclic_number_of_cycles", LOADING, "loading_out_of_plane", "Out-of-plane number of cycles per amplitude level"),
    FieldSpec::text("oop_cyclic_repetition", LOADING, "loading_out_of_plane", "Out-of-plane cyclic repetition pattern. Options: 1. constant 2. increasing"),
    FieldSpec::text("oop_cyclic_protocol", LOADING, "loading_out_of_plane", "Out-of-plane cyclic protocol standard: FEMA461, ACI374, etc OR none (not_applicable)"),
    FieldSpec::quantity("oop_column_vertical_load", LOADING, "loading_out_of_plane", UnitFamily::ConcentratedForce, "kN", "Out-of-plane column vertical load"),
    FieldSpec::quantity("oop_beam_vertical_load", LOADING, "loading_out_of_plane", UnitFamily::DistributedForce, "kN/m", "Out-of-plane beam distributed vertical load"),

    // response
    FieldSpec::quantity("glb_initial_stiffness", RESPONSE, "global_response", UnitFamily::DistributedForce, "kN/m", "Global initial stiffness"),
    FieldSpec::quantity("glb_peak_lateral_load", RESPONSE, "global_response", UnitFamily::ConcentratedForce, "kN", "Global peak lateral load"),
    FieldSpec::quantity("glb_drift_at_peak_lateral_load", RESPONSE, "global_response", UnitFamily::Strain, "ratio", "Global drift ratio at peak lateral load"),
    FieldSpec::quantity("glb_peak_lateral_drift", RESPONSE, "global_response", UnitFamily::Strain, "ratio", "Global peak lateral drift ratio"),
    FieldSpec::quantity("glb_load_at_peak_lateral_drift", RESPONSE, "global_response", UnitFamily::ConcentratedForce, "kN", "Global load at peak lateral drift"),
    FieldSpec::quantity("glb_energy_dissipation", RESPONSE, "global_response", UnitFamily::Work, "kJ", "Global energy dissipation"),
    FieldSpec::text("glb_failure_mode", RESPONSE, "global_response", "Global failure mode description"),
    FieldSpec::text("lcl_crack_pattern", RESPONSE, "local_response", "Local crack pattern description"),
    FieldSpec::text("lcl_failure_mechanism", RESPONSE, "local_response", "Local failure mechanism description"),
    FieldSpec::text("lcl_damage_progression", RESPONSE, "local_response", "Local damage progression description"),
    FieldSpec::text("lcl_strain_distribution", RESPONSE, "local_response", "Local strain distribution description"),

    // retrofit
    FieldSpec::text("retrofit_techniques", RETROFIT, "", "A maximum of four (4) sentences describing retrofitting techniques applied to the specimen."),

    // comments
    FieldSpec::text("comments", COMMENTS, "", "General comments for user"),
];

/// Default ("empty") value of every field.
pub(crate) const RC_FRAME_DEFAULTS: &[(&str, DefaultValue)] = &[
    ("specimen_id", DefaultValue::Text("none")),
    ("specimen_scale", DefaultValue::Real(0.0)),
    ("source", DefaultValue::Text("none")),
    ("title", DefaultValue::Text("none")),
    ("authors", DefaultValue::Text("none")),
    ("year", DefaultValue::Integer(0)),
    ("frm_h", DefaultValue::Real(0.0)),
    ("frm_l", DefaultValue::Real(0.0)),
    ("col_h", DefaultValue::Real(0.0)),
    ("col_d", DefaultValue::Real(0.0)),
    ("bm_h", DefaultValue::Real(0.0)),
    ("bm_t", DefaultValue::Real(0.0)),
    ("bbm_h", DefaultValue::Real(0.0)),
    ("bbm_t", DefaultValue::Real(0.0)),
    ("slb_d", DefaultValue::Real(0.0)),
    ("slb_h", DefaultValue::Real(0.0)),
    ("col_ext", DefaultValue::Real(0.0)),
    ("bm_ext", DefaultValue::Real(0.0)),
    ("bbm_ext", DefaultValue::Real(0.0)),
    ("inf_type", DefaultValue::Text("none")),
    ("inf_opn_type", DefaultValue::Text("none")),
    ("inf_win_h", DefaultValue::Real(0.0)),
    ("inf_win_v", DefaultValue::Real(0.0)),
    ("inf_win_ph", DefaultValue::Real(0.0)),
    ("inf_win_pv", DefaultValue::Real(0.0)),
    ("inf_door_h", DefaultValue::Real(0.0)),
    ("inf_door_v", DefaultValue::Real(0.0)),
    ("inf_door_ph", DefaultValue::Real(0.0)),
    ("inf_door_pv", DefaultValue::Real(0.0)),
    ("inf_dp", DefaultValue::Real(0.0)),
    ("inf_bnd_pat", DefaultValue::Text("none")),
    ("inf_inff_intfc", DefaultValue::Text("none")),
    ("inf_interface_bottom", DefaultValue::Real(0.0)),
    ("inf_interface_left", DefaultValue::Real(0.0)),
    ("inf_interface_top", DefaultValue::Real(0.0)),
    ("inf_interface_right", DefaultValue::Real(0.0)),
    ("inf_ul", DefaultValue::Real(0.0)),
    ("inf_uh", DefaultValue::Real(0.0)),
    ("inf_ut", DefaultValue::Real(0.0)),
    ("inf_uhead_t", DefaultValue::Real(0.0)),
    ("inf_ubed_t", DefaultValue::Real(0.0)),
    ("col_cover", DefaultValue::Real(0.0)),
    ("col_long_reinf_corner", DefaultValue::Text("0#0")),
    ("col_long_reinf_top", DefaultValue::Text("0#0")),
    ("col_long_reinf_mid", DefaultValue::Text("0#0")),
    ("col_long_reinf_bot", DefaultValue::Text("0#0")),
    ("col_trans_crit_top_distance", DefaultValue::Real(0.0)),
    ("col_trans_crit_top_reinf", DefaultValue::Text("0#0@0")),
    ("col_trans_crit_bot_distance", DefaultValue::Real(0.0)),
    ("col_trans_crit_bot_reinf", DefaultValue::Text("0#0@0")),
    ("col_trans_mid_reinf", DefaultValue::Text("0#0@0")),
    ("bm_cover", DefaultValue::Real(0.0)),
    ("bm_long_reinf_corner", DefaultValue::Text("0#0")),
    ("bm_long_reinf_top", DefaultValue::Text("0#0")),
    ("bm_long_reinf_mid", DefaultValue::Text("0#0")),
    ("bm_long_reinf_bot", DefaultValue::Text("0#0")),
    ("bm_trans_crit_left_distance", DefaultValue::Real(0.0)),
    ("bm_trans_crit_left_reinf", DefaultValue::Text("0#0@0")),
    ("bm_trans_crit_right_distance", DefaultValue::Real(0.0)),
    ("bm_trans_crit_right_reinf", DefaultValue::Text("0#0@0")),
    ("bm_trans_mid_reinf", DefaultValue::Text("0#0@0")),
    ("bbm_cover", DefaultValue::Real(0.0)),
    ("bbm_long_reinf_corner", DefaultValue::Text("0#0")),
    ("bbm_long_reinf_top", DefaultValue::Text("0#0")),
    ("bbm_long_reinf_mid", DefaultValue::Text("0#0")),
    ("bbm_long_reinf_bot", DefaultValue::Text("0#0")),
    ("bbm_trans_crit_left_distance", DefaultValue::Real(0.0)),
    ("bbm_trans_crit_left_reinf", DefaultValue::Text("0#0@0")),
    ("bbm_trans_crit_right_distance", DefaultValue::Real(0.0)),
    ("bbm_trans_crit_right_reinf", DefaultValue::Text("0#0@0")),
    ("bbm_trans_mid_reinf", DefaultValue::Text("0#0@0")),
    ("slb_cover", DefaultValue::Real(0.0)),
    ("slb_top_l_reinf", DefaultValue::Text("0#0@0")),
    ("slb_top_d_reinf", DefaultValue::Text("0#0@0")),
    ("slb_bot_l_reinf", DefaultValue::Text("0#0@0")),
    ("slb_bot_d_reinf", DefaultValue::Text("0#0@0")),
    ("fc", DefaultValue::Real(0.0)),
    ("Ec", DefaultValue::Real(0.0)),
    ("conc_prop_day", DefaultValue::Real(0.0)),
    ("conc_density", DefaultValue::Real(0.0)),
    ("fy", DefaultValue::Real(0.0)),
    ("fu", DefaultValue::Real(0.0)),
    ("Ey", DefaultValue::Real(0.0)),
    ("stl_density", DefaultValue::Real(0.0)),
    ("inf_unit_density", DefaultValue::Real(0.0)),
    ("inf_mortar_density", DefaultValue::Real(0.0)),
    ("inf_unit_compressive_strength_length", DefaultValue::Real(0.0)),
    ("inf_unit_compressive_strength_height", DefaultValue::Real(0.0)),
    ("inf_unit_compressive_strength_width", DefaultValue::Real(0.0)),
    ("inf_mortar_type", DefaultValue::Text("none")),
    ("inf_mortar_compressive_strength", DefaultValue::Real(0.0)),
    ("inf_assembly_compressive_strength_height", DefaultValue::Real(0.0)),
    ("inf_assembly_compressive_strength_diagonal", DefaultValue::Real(0.0)),
    ("inp_loading_protocol", DefaultValue::Text("none")),
    ("inp_cyclic_number_of_cycles", DefaultValue::Integer(0)),
    ("inp_cyclic_repetition", DefaultValue::Text("none")),
    ("inp_cyclic_protocol", DefaultValue::Text("none")),
    ("inp_column_vertical_load", DefaultValue::Real(0.0)),
    ("inp_beam_vertical_load", DefaultValue::Real(0.0)),
    ("oop_loading_protocol", DefaultValue::Text("none")),
    ("oop_cyclic_number_of_cycles", DefaultValue::Integer(0)),
    ("oop_cyclic_repetition", DefaultValue::Text("none")),
    ("oop_cyclic_protocol", DefaultValue::Text("none")),
    ("oop_column_vertical_load", DefaultValue::Real(0.0)),
    ("oop_beam_vertical_load", DefaultValue::Real(0.0)),
    ("glb_initial_stiffness", DefaultValue::Real(0.0)),
    ("glb_peak_lateral_load", DefaultValue::Real(0.0)),
    ("glb_drift_at_peak_lateral_load", DefaultValue::Real(0.0)),
    ("glb_peak_lateral_drift", DefaultValue::Real(0.0)),
    ("glb_load_at_peak_lateral_drift", DefaultValue::Real(0.0)),
    ("glb_energy_dissipation", DefaultValue::Real(0.0)),
    ("glb_failure_mode", DefaultValue::Text("none")),
    ("lcl_crack_pattern", DefaultValue::Text("none")),
    ("lcl_failure_mechanism", DefaultValue::Text("none")),
    ("lcl_damage_progression", DefaultValue::Text("none")),
    ("lcl_strain_distribution", DefaultValue::Text("none")),
    ("retrofit_techniques", DefaultValue::Text("none")),
    ("comments", DefaultValue::Text("none")),
];
