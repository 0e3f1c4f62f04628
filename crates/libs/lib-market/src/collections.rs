//! Known collection contracts on Fantom Opera.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub name: &'static str,
    /// Lowercase contract address
    pub address: &'static str,
}

pub const COLLECTIONS: [Collection; 10] = [
    Collection { name: "Baby Boo", address: "0xf6a4dc2c70e45a43c85151c4afa89f3ea9c463fd" },
    Collection { name: "Fantums", address: "0x0c600d41b9c7656e60c0bf76d79b1532b4770d0c" },
    Collection { name: "Strange Brew", address: "0x9044948e1a934340766c16f094cc32205d60d1b2" },
    Collection { name: "Shiba Punks", address: "0x28908d5795b4d8f4cc175c63523f974412f2a5b1" },
    Collection { name: "Fantom Rock", address: "0xc5fa69f0d478923af8c798cd770f2eed4e40eb99" },
    Collection { name: "BitUman", address: "0x8c2fcd5d857ee9aa19d1a27ae81ab1129385e3ac" },
    Collection { name: "Fantom Paper", address: "0x3192f48983a52450db53e9671ec409e4d6b6d622" },
    Collection { name: "Fantom Waifus", address: "0x92d822978872f12a5d381bd7089461e7ad3634bc" },
    Collection { name: "Gantom Stone", address: "0x3d7071e5647251035271aeb780d832b381fa730f" },
    Collection { name: "Fantom Mooncats", address: "0xb3629177f46686106c8b83d03613041d805ccdcd" },
];

/// Case-insensitive lookup by contract address.
pub fn find_by_address(address: &str) -> Option<&'static Collection> {
    let address = address.trim();
    COLLECTIONS
        .iter()
        .find(|c| c.address.eq_ignore_ascii_case(address))
}

/// Case-insensitive lookup by display name.
pub fn find_by_name(name: &str) -> Option<&'static Collection> {
    let name = name.trim();
    COLLECTIONS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Display name for a contract, if it is a known collection.
pub fn name_of(address: &str) -> Option<&'static str> {
    find_by_address(address).map(|c| c.name)
}
