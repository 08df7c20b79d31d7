use crate::domain::types::{Address, DeliveryStop, PackageType, QuoteRequest};

/// A representative multi-drop request across the Salt Lake City service
/// area, used by the demo runner.
pub fn demo_request() -> QuoteRequest {
    QuoteRequest {
        business: Address {
            business_name: "Wasatch Supply Co".to_string(),
            street_number: "300".to_string(),
            street_name: "W Broadway".to_string(),
            address_line2: String::new(),
            city: "Salt Lake City".to_string(),
            state: "UT".to_string(),
            zip_code: "84101".to_string(),
        },
        stops: vec![
            DeliveryStop {
                id: "stop-1".to_string(),
                address: Address {
                    business_name: String::new(),
                    street_number: "5353".to_string(),
                    street_name: "S 960 E".to_string(),
                    address_line2: String::new(),
                    city: "Murray".to_string(),
                    state: "UT".to_string(),
                    zip_code: "84117".to_string(),
                },
                package_type: PackageType::Medium,
                package_description: "Irrigation fittings".to_string(),
                customer_name: "Hansen Landscaping".to_string(),
                contact_phone: "(801) 555-0114".to_string(),
            },
            DeliveryStop {
                id: "stop-2".to_string(),
                address: Address {
                    business_name: String::new(),
                    street_number: "1255".to_string(),
                    street_name: "Park Ave".to_string(),
                    address_line2: String::new(),
                    city: "Park City".to_string(),
                    state: "UT".to_string(),
                    zip_code: "84060".to_string(),
                },
                package_type: PackageType::Fragile,
                package_description: "Glass panels".to_string(),
                customer_name: "Summit Interiors".to_string(),
                contact_phone: "(435) 555-0162".to_string(),
            },
            DeliveryStop {
                id: "stop-3".to_string(),
                address: Address {
                    business_name: String::new(),
                    street_number: "7505".to_string(),
                    street_name: "S Holden St".to_string(),
                    address_line2: String::new(),
                    city: "Midvale".to_string(),
                    state: "UT".to_string(),
                    zip_code: "84047".to_string(),
                },
                package_type: PackageType::Small,
                package_description: "Fastener assortment".to_string(),
                customer_name: "Peak Hardware".to_string(),
                contact_phone: "(801) 555-0177".to_string(),
            },
        ],
        urgency: "same-day".to_string(),
    }
}
