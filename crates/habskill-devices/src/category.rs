/*!
 * Alexa display categories.
 */
use std::fmt;

/// Display category shown in the Alexa app
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayCategory {
    ActivityTrigger,
    AirConditioner,
    AirFreshener,
    AirPurifier,
    Camera,
    ChristmasTree,
    CoffeeMaker,
    Computer,
    ContactSensor,
    Dishwasher,
    Door,
    Doorbell,
    Dryer,
    ExteriorBlind,
    Fan,
    GameConsole,
    GarageDoor,
    Headphones,
    Hub,
    InteriorBlind,
    Laptop,
    Light,
    Microwave,
    MobilePhone,
    MotionSensor,
    MusicSystem,
    NetworkHardware,
    Other,
    Oven,
    Phone,
    Printer,
    Router,
    SceneTrigger,
    Screen,
    SecurityPanel,
    SecuritySystem,
    SlowCooker,
    Smartlock,
    Smartplug,
    Speaker,
    StreamingDevice,
    Switch,
    Tablet,
    TemperatureSensor,
    Thermostat,
    Tv,
    VacuumCleaner,
    Washer,
    WaterHeater,
    Wearable,
}

impl DisplayCategory {
    /// Convert to the Alexa category token
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayCategory::ActivityTrigger => "ACTIVITY_TRIGGER",
            DisplayCategory::AirConditioner => "AIR_CONDITIONER",
            DisplayCategory::AirFreshener => "AIR_FRESHENER",
            DisplayCategory::AirPurifier => "AIR_PURIFIER",
            DisplayCategory::Camera => "CAMERA",
            DisplayCategory::ChristmasTree => "CHRISTMAS_TREE",
            DisplayCategory::CoffeeMaker => "COFFEE_MAKER",
            DisplayCategory::Computer => "COMPUTER",
            DisplayCategory::ContactSensor => "CONTACT_SENSOR",
            DisplayCategory::Dishwasher => "DISHWASHER",
            DisplayCategory::Door => "DOOR",
            DisplayCategory::Doorbell => "DOORBELL",
            DisplayCategory::Dryer => "DRYER",
            DisplayCategory::ExteriorBlind => "EXTERIOR_BLIND",
            DisplayCategory::Fan => "FAN",
            DisplayCategory::GameConsole => "GAME_CONSOLE",
            DisplayCategory::GarageDoor => "GARAGE_DOOR",
            DisplayCategory::Headphones => "HEADPHONES",
            DisplayCategory::Hub => "HUB",
            DisplayCategory::InteriorBlind => "INTERIOR_BLIND",
            DisplayCategory::Laptop => "LAPTOP",
            DisplayCategory::Light => "LIGHT",
            DisplayCategory::Microwave => "MICROWAVE",
            DisplayCategory::MobilePhone => "MOBILE_PHONE",
            DisplayCategory::MotionSensor => "MOTION_SENSOR",
            DisplayCategory::MusicSystem => "MUSIC_SYSTEM",
            DisplayCategory::NetworkHardware => "NETWORK_HARDWARE",
            DisplayCategory::Other => "OTHER",
            DisplayCategory::Oven => "OVEN",
            DisplayCategory::Phone => "PHONE",
            DisplayCategory::Printer => "PRINTER",
            DisplayCategory::Router => "ROUTER",
            DisplayCategory::SceneTrigger => "SCENE_TRIGGER",
            DisplayCategory::Screen => "SCREEN",
            DisplayCategory::SecurityPanel => "SECURITY_PANEL",
            DisplayCategory::SecuritySystem => "SECURITY_SYSTEM",
            DisplayCategory::SlowCooker => "SLOW_COOKER",
            DisplayCategory::Smartlock => "SMARTLOCK",
            DisplayCategory::Smartplug => "SMARTPLUG",
            DisplayCategory::Speaker => "SPEAKER",
            DisplayCategory::StreamingDevice => "STREAMING_DEVICE",
            DisplayCategory::Switch => "SWITCH",
            DisplayCategory::Tablet => "TABLET",
            DisplayCategory::TemperatureSensor => "TEMPERATURE_SENSOR",
            DisplayCategory::Thermostat => "THERMOSTAT",
            DisplayCategory::Tv => "TV",
            DisplayCategory::VacuumCleaner => "VACUUM_CLEANER",
            DisplayCategory::Washer => "WASHER",
            DisplayCategory::WaterHeater => "WATER_HEATER",
            DisplayCategory::Wearable => "WEARABLE",
        }
    }
}

impl fmt::Display for DisplayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
