/*!
 * Alexa units of measure.
 */

const UNITS: &[&str] = &[
    "Angle.Degrees",
    "Angle.Radians",
    "Distance.Feet",
    "Distance.Inches",
    "Distance.Kilometers",
    "Distance.Meters",
    "Distance.Miles",
    "Distance.Yards",
    "Mass.Grams",
    "Mass.Kilograms",
    "Percent",
    "Temperature.Celsius",
    "Temperature.Degrees",
    "Temperature.Fahrenheit",
    "Temperature.Kelvin",
    "Volume.CubicFeet",
    "Volume.CubicMeters",
    "Volume.Gallons",
    "Volume.Liters",
    "Volume.Pints",
    "Volume.Quarts",
    "Weight.Ounces",
    "Weight.Pounds",
];

const SYMBOLS: &[(&str, &str)] = &[
    ("°", "Angle.Degrees"),
    ("rad", "Angle.Radians"),
    ("ft", "Distance.Feet"),
    ("in", "Distance.Inches"),
    ("km", "Distance.Kilometers"),
    ("m", "Distance.Meters"),
    ("mi", "Distance.Miles"),
    ("yd", "Distance.Yards"),
    ("g", "Mass.Grams"),
    ("kg", "Mass.Kilograms"),
    ("%", "Percent"),
    ("°C", "Temperature.Celsius"),
    ("°F", "Temperature.Fahrenheit"),
    ("K", "Temperature.Kelvin"),
    ("ft³", "Volume.CubicFeet"),
    ("m³", "Volume.CubicMeters"),
    ("gal", "Volume.Gallons"),
    ("l", "Volume.Liters"),
    ("pt", "Volume.Pints"),
    ("qt", "Volume.Quarts"),
    ("oz", "Weight.Ounces"),
    ("lb", "Weight.Pounds"),
];

/// Resolve a unit name into an Alexa unit id
///
/// Accepts bare names ("Percent"), prefixed ids ("Alexa.Unit.Percent") and
/// item state symbols ("%").
pub fn unit_id(unit: &str) -> Option<String> {
    let unit = unit.trim();
    let name = unit.strip_prefix("Alexa.Unit.").unwrap_or(unit);

    UNITS
        .iter()
        .find(|id| id.eq_ignore_ascii_case(name))
        .or_else(|| SYMBOLS.iter().find(|(symbol, _)| *symbol == name).map(|(_, id)| id))
        .map(|id| format!("Alexa.Unit.{}", id))
}

/// Resolve the unit symbol of an item state (e.g. "42 %") into an Alexa unit id
pub fn unit_id_from_state(state: &str) -> Option<String> {
    let (_, symbol) = state.trim().split_once(' ')?;
    SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol.trim())
        .map(|(_, id)| format!("Alexa.Unit.{}", id))
}
