//! Constants - Field names and the built-in feature layout

// ============================================================================
// RAW INPUT KEYS
// ============================================================================

pub const FIELD_MILAGE: &str = "milage";
pub const FIELD_CAR_AGE: &str = "car_age";
pub const FIELD_CLEAN_TITLE: &str = "clean_title";
pub const FIELD_ACCIDENT: &str = "accident_label_enc";

pub const FIELD_FUEL_TYPE: &str = "fuel_type";
pub const FIELD_BRAND: &str = "brand";
pub const FIELD_TRANSMISSION: &str = "transmission";
pub const FIELD_EXT_COL: &str = "ext_col";
pub const FIELD_INT_COL: &str = "int_col";

/// Every key a request must carry
pub const REQUIRED_FIELDS: &[&str] = &[
    FIELD_MILAGE,
    FIELD_CAR_AGE,
    FIELD_CLEAN_TITLE,
    FIELD_ACCIDENT,
    FIELD_FUEL_TYPE,
    FIELD_BRAND,
    FIELD_TRANSMISSION,
    FIELD_EXT_COL,
    FIELD_INT_COL,
];

// ============================================================================
// SCHEMA COLUMNS
// ============================================================================

pub const COLUMN_MILAGE: &str = "milage";
pub const COLUMN_CAR_AGE: &str = "car_age";
pub const COLUMN_CLEAN_TITLE: &str = "clean_title_label_enc";
pub const COLUMN_ACCIDENT: &str = "accident_label_enc";

/// One-hot group prefixes, in the order they are encoded
pub const ONE_HOT_GROUPS: &[&str] = &[
    FIELD_FUEL_TYPE,
    FIELD_BRAND,
    FIELD_TRANSMISSION,
    FIELD_EXT_COL,
    FIELD_INT_COL,
];

/// Column layout the deployed XGBoost regressor was trained with.
/// Order matters: it is the exact training column order.
pub const DEFAULT_FEATURES: &[&str] = &[
    // === Numeric (0-3) ===
    "milage",
    "car_age",
    "clean_title_label_enc",
    "accident_label_enc",

    // === Fuel type (4-5) ===
    "fuel_type_Gasoline",
    "fuel_type_Hybrid",

    // === Brand (6-9) ===
    "brand_Ford",
    "brand_BMW",
    "brand_Jaguar",
    "brand_Pontiac",

    // === Transmission (10-14) ===
    "transmission_10-Speed A/T",
    "transmission_6-Speed M/T",
    "transmission_6-Speed A/T",
    "transmission_Transmission w/Dual Shift Mode",
    "transmission_A/T",

    // === Exterior color (15-19) ===
    "ext_col_Black",
    "ext_col_White",
    "ext_col_Gray",
    "ext_col_Blue",
    "ext_col_Purple",

    // === Interior color (20-23) ===
    "int_col_Black",
    "int_col_Gray",
    "int_col_Beige",
    "int_col_Brown",
];

/// Message shown to end users for any failed estimate
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while processing your request. Please check your inputs.";

/// Decimal places kept in a returned estimate
pub const PREDICTION_DECIMALS: i32 = 2;
