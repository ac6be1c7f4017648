use docmodel_derive::Record;
use std::collections::BTreeMap;

///
/// Account
///

#[derive(Clone, Debug, Default, Record)]
pub struct Account {
    #[record(tag = "email,required,email")]
    pub email: String,

    #[record(tag = "password,required,min=6,omitempty")]
    pub password: String,

    #[record(tag = "-")]
    pub secret: String,

    #[record(tag = ",omitempty")]
    pub age: u32,
}

///
/// Profile
///

#[derive(Clone, Debug, Default, Record)]
#[record(rename_all = "camelCase")]
pub struct Profile {
    #[record(tag = ",required")]
    pub display_name: String,

    pub address: Option<Address>,
    pub previous: Vec<Address>,
    pub labels: BTreeMap<String, String>,
}

///
/// Address
///

#[derive(Clone, Debug, Default, Record)]
pub struct Address {
    #[record(tag = "city,required")]
    pub city: String,

    #[record(tag = ",omitempty")]
    pub zip: u32,
}
