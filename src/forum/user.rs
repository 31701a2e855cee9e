use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::UserId;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

/// Every editable field of a [`User`], nested ones included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ProfileField {
    Name,
    Username,
    Email,
    Phone,
    Website,
    Company,
    CatchPhrase,
    Bs,
    Street,
    Suite,
    City,
    Zipcode,
    Lat,
    Lng,
}

impl ProfileField {
    /// Parse a field name as typed by the user, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Website => "Website",
            Self::Company => "Company",
            Self::CatchPhrase => "Catch phrase",
            Self::Bs => "Business",
            Self::Street => "Street",
            Self::Suite => "Suite",
            Self::City => "City",
            Self::Zipcode => "Zipcode",
            Self::Lat => "Latitude",
            Self::Lng => "Longitude",
        }
    }

    pub fn get<'a>(&self, user: &'a User) -> &'a str {
        match self {
            Self::Name => &user.name,
            Self::Username => &user.username,
            Self::Email => &user.email,
            Self::Phone => &user.phone,
            Self::Website => &user.website,
            Self::Company => &user.company.name,
            Self::CatchPhrase => &user.company.catch_phrase,
            Self::Bs => &user.company.bs,
            Self::Street => &user.address.street,
            Self::Suite => &user.address.suite,
            Self::City => &user.address.city,
            Self::Zipcode => &user.address.zipcode,
            Self::Lat => &user.address.geo.lat,
            Self::Lng => &user.address.geo.lng,
        }
    }

    pub fn apply(&self, user: &mut User, value: String) {
        let slot = match self {
            Self::Name => &mut user.name,
            Self::Username => &mut user.username,
            Self::Email => &mut user.email,
            Self::Phone => &mut user.phone,
            Self::Website => &mut user.website,
            Self::Company => &mut user.company.name,
            Self::CatchPhrase => &mut user.company.catch_phrase,
            Self::Bs => &mut user.company.bs,
            Self::Street => &mut user.address.street,
            Self::Suite => &mut user.address.suite,
            Self::City => &mut user.address.city,
            Self::Zipcode => &mut user.address.zipcode,
            Self::Lat => &mut user.address.geo.lat,
            Self::Lng => &mut user.address.geo.lng,
        };
        *slot = value;
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => write!(f, "{}", value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEANNE: &str = r#"{
      "id": 1,
      "name": "Leanne Graham",
      "username": "Bret",
      "email": "Sincere@april.biz",
      "address": {
        "street": "Kulas Light",
        "suite": "Apt. 556",
        "city": "Gwenborough",
        "zipcode": "92998-3874",
        "geo": { "lat": "-37.3159", "lng": "81.1496" }
      },
      "phone": "1-770-736-8031 x56442",
      "website": "hildegard.org",
      "company": {
        "name": "Romaguera-Crona",
        "catchPhrase": "Multi-layered client-server neural-net",
        "bs": "harness real-time e-markets"
      }
    }"#;

    #[test]
    fn decodes_nested_record() {
        let user: User = serde_json::from_str(LEANNE).unwrap();
        assert_eq!(user.address.geo.lng, "81.1496");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
    }

    #[test]
    fn nested_fields_edit_in_place() {
        let mut user: User = serde_json::from_str(LEANNE).unwrap();
        ProfileField::City.apply(&mut user, "Lisbon".into());
        ProfileField::Company.apply(&mut user, "Acme".into());
        assert_eq!(user.address.city, "Lisbon");
        assert_eq!(user.company.name, "Acme");
        assert_eq!(user.address.street, "Kulas Light");
        assert_eq!(ProfileField::City.get(&user), "Lisbon");
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!(ProfileField::parse("ZipCode"), Some(ProfileField::Zipcode));
        assert_eq!(ProfileField::parse("catch-phrase"), Some(ProfileField::CatchPhrase));
        assert_eq!(ProfileField::parse("address.city"), None);
        assert_eq!(ProfileField::CatchPhrase.to_string(), "catch-phrase");
    }

    #[test]
    fn reencodes_with_api_names() {
        let user: User = serde_json::from_str(LEANNE).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["company"]["catchPhrase"], "Multi-layered client-server neural-net");
        assert_eq!(value["address"]["zipcode"], "92998-3874");
    }
}
