//! Built-in directory seed data.
//!
//! Stands in for the hospital network's backend; the mock provider serves
//! these fixtures behind its simulated latency.

use crate::booking::{Doctor, Hospital};

pub(crate) fn hospitals() -> Vec<Hospital> {
    vec![
        Hospital {
            id: 1,
            name: "City General Hospital".to_string(),
            address: "123 Main Street, Downtown".to_string(),
            rating: 4.5,
            departments: vec![
                "Cardiology".to_string(),
                "Neurology".to_string(),
                "Orthopedics".to_string(),
                "Pediatrics".to_string(),
                "Dermatology".to_string(),
            ],
        },
        Hospital {
            id: 2,
            name: "Westside Medical Center".to_string(),
            address: "456 West Avenue, Westside".to_string(),
            rating: 4.2,
            departments: vec![
                "Oncology".to_string(),
                "Gynecology".to_string(),
                "Urology".to_string(),
                "Psychiatry".to_string(),
                "Ophthalmology".to_string(),
            ],
        },
        Hospital {
            id: 3,
            name: "Eastside Health Institute".to_string(),
            address: "789 East Boulevard, Eastside".to_string(),
            rating: 4.7,
            departments: vec![
                "Cardiology".to_string(),
                "Pulmonology".to_string(),
                "Endocrinology".to_string(),
                "Rheumatology".to_string(),
                "Nephrology".to_string(),
            ],
        },
        Hospital {
            id: 4,
            name: "North County Medical".to_string(),
            address: "101 North Road, Northside".to_string(),
            rating: 4.0,
            departments: vec![
                "Family Medicine".to_string(),
                "Internal Medicine".to_string(),
                "Emergency Medicine".to_string(),
                "Radiology".to_string(),
                "Pathology".to_string(),
            ],
        },
    ]
}

pub(crate) fn doctors(department: &str) -> Vec<Doctor> {
    vec![
        Doctor {
            id: 1,
            name: "Dr. Sarah Johnson".to_string(),
            specialty: department.to_string(),
            rating: 4.8,
            experience: "15 years".to_string(),
            education: "MD, Harvard Medical School".to_string(),
            availability: "Mon, Wed, Fri".to_string(),
        },
        Doctor {
            id: 2,
            name: "Dr. Michael Chen".to_string(),
            specialty: department.to_string(),
            rating: 4.6,
            experience: "10 years".to_string(),
            education: "MD, Johns Hopkins University".to_string(),
            availability: "Tue, Thu, Sat".to_string(),
        },
        Doctor {
            id: 3,
            name: "Dr. Emily Wilson".to_string(),
            specialty: department.to_string(),
            rating: 4.9,
            experience: "12 years".to_string(),
            education: "MD, Stanford University".to_string(),
            availability: "Mon, Tue, Thu".to_string(),
        },
    ]
}
