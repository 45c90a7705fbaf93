use hex_literal::hex;
use num_bigint::BigUint;

use sigma_or_proofs::test_utils::{test_group, toy_group};
use sigma_or_proofs::{
    decimal_to_bytes, decimal_to_fixed_byte_tree, decimal_to_group_element, decimal_to_hex,
    strip_whitespace, ByteTree, ElementConstructionError, Error, ModPGroup, PGroup,
};

#[test]
fn fixed_width_encoding_pads_on_the_left() {
    assert_eq!(
        decimal_to_fixed_byte_tree("255", 2).unwrap(),
        ByteTree::Leaf(vec![0x00, 0xff])
    );
    assert_eq!(
        decimal_to_fixed_byte_tree("0", 3).unwrap(),
        ByteTree::Leaf(vec![0x00, 0x00, 0x00])
    );
    // exact fit is accepted
    assert_eq!(
        decimal_to_fixed_byte_tree("65535", 2).unwrap(),
        ByteTree::Leaf(vec![0xff, 0xff])
    );
}

#[test]
fn fixed_width_encoding_decodes_back() {
    for value in [0u64, 1, 255, 256, 65_535, 1 << 24, u64::MAX] {
        let natural = decimal_to_bytes(value).unwrap().len();
        for target in natural..natural + 3 {
            let tree = decimal_to_fixed_byte_tree(value, target).unwrap();
            let bytes = tree.as_leaf().unwrap();
            assert_eq!(bytes.len(), target);
            assert_eq!(BigUint::from_bytes_be(bytes), BigUint::from(value));
        }
    }
}

#[test]
fn oversize_values_are_refused() {
    assert!(matches!(
        decimal_to_fixed_byte_tree("256", 1),
        Err(Error::Oversize {
            length: 2,
            target: 1
        })
    ));
    assert!(matches!(
        decimal_to_fixed_byte_tree("1", 0),
        Err(Error::Oversize {
            length: 1,
            target: 0
        })
    ));
}

#[test]
fn text_and_integer_inputs_agree() {
    for n in [0u64, 1, 15, 16, 255, 256, 1 << 40, u64::MAX] {
        let text = n.to_string();
        assert_eq!(decimal_to_hex(n).unwrap(), decimal_to_hex(text.as_str()).unwrap());
        assert_eq!(
            decimal_to_bytes(n).unwrap(),
            decimal_to_bytes(text.as_str()).unwrap()
        );
    }
    assert_eq!(
        decimal_to_bytes(BigUint::from(0x0102_0304u32)).unwrap(),
        hex!("01020304")
    );
}

#[test]
fn invalid_decimal_text() {
    for input in ["-1", "12a", "0x10", " 5", "5 ", "1.0", "+3"] {
        assert!(
            matches!(decimal_to_hex(input), Err(Error::InvalidDecimal { .. })),
            "{input:?} should be rejected"
        );
    }
}

#[test]
fn whitespace_can_be_stripped_first() {
    let text = " 1234\n5678\t90 ";
    assert_eq!(strip_whitespace(text), "1234567890");
    assert_eq!(
        decimal_to_hex(strip_whitespace(text)).unwrap(),
        decimal_to_hex(1_234_567_890u64).unwrap()
    );
}

#[test]
fn group_elements_from_decimal() {
    let group = toy_group();
    assert_eq!(group.modulus_byte_length(), 2);

    let four = decimal_to_group_element("4", &group).unwrap();
    assert_eq!(four, group.generator());
    assert_eq!(four.to_byte_tree(), ByteTree::Leaf(vec![0x00, 0x04]));

    let element = decimal_to_group_element("1000", &group).unwrap();
    assert_eq!(element.value(), &BigUint::from(1000u32));
}

#[test]
fn every_subgroup_element_round_trips() {
    let group = toy_group();
    let mut members = 0;
    for v in 1u32..2039 {
        let expected = group.element(BigUint::from(v));
        match decimal_to_group_element(v.to_string().as_str(), &group) {
            Ok(element) => {
                assert_eq!(element.value(), &BigUint::from(v));
                assert_eq!(Some(element), expected.ok());
                members += 1;
            }
            Err(Error::ElementConstruction(ElementConstructionError::NotInSubgroup)) => {
                assert!(expected.is_err());
            }
            Err(err) => panic!("unexpected error for {v}: {err}"),
        }
    }
    // the subgroup of quadratic residues has order q
    assert_eq!(members, 1019);
}

#[test]
fn group_element_failures() {
    let group = toy_group();
    let construction = |value: &str| match decimal_to_group_element(value, &group) {
        Err(Error::ElementConstruction(err)) => Some(err),
        _ => None,
    };
    assert_eq!(construction("0"), Some(ElementConstructionError::Zero));
    assert_eq!(construction("2039"), Some(ElementConstructionError::OutOfRange));
    assert_eq!(construction("65535"), Some(ElementConstructionError::OutOfRange));
    assert_eq!(construction("7"), Some(ElementConstructionError::NotInSubgroup));
    assert_eq!(construction("2038"), Some(ElementConstructionError::NotInSubgroup));

    assert!(matches!(
        decimal_to_group_element("65536", &group),
        Err(Error::Oversize { .. })
    ));
}

#[test]
fn large_group_round_trip() {
    let group = test_group();
    assert_eq!(group.modulus_byte_length(), 32);

    let g = decimal_to_group_element("4", &group).unwrap();
    let tree = g.to_byte_tree();
    assert_eq!(
        tree.as_leaf().unwrap(),
        hex!("0000000000000000000000000000000000000000000000000000000000000004")
    );
    assert_eq!(group.to_element(&tree).unwrap(), g);

    let modulus = group.modulus().to_str_radix(10);
    assert!(matches!(
        decimal_to_group_element(modulus.as_str(), &group),
        Err(Error::ElementConstruction(ElementConstructionError::OutOfRange))
    ));
    assert!(matches!(
        decimal_to_group_element("2", &group),
        Err(Error::ElementConstruction(ElementConstructionError::NotInSubgroup))
    ));
}

#[test]
fn to_element_checks_framing() {
    let group = toy_group();
    assert!(matches!(
        group.to_element(&ByteTree::Leaf(vec![0x04])),
        Err(Error::ElementConstruction(ElementConstructionError::WrongLength {
            expected: 2,
            actual: 1
        }))
    ));
    assert!(matches!(
        group.to_element(&ByteTree::node([ByteTree::leaf([0x00, 0x04])])),
        Err(Error::ElementConstruction(ElementConstructionError::NotALeaf))
    ));
}

#[test]
fn invalid_group_parameters() {
    let p = BigUint::from(2039u32);
    // 7 is not a quadratic residue modulo 2039
    assert!(matches!(
        ModPGroup::new(p.clone(), BigUint::from(7u32)),
        Err(Error::InvalidGroupParameters { .. })
    ));
    assert!(matches!(
        ModPGroup::new(p, BigUint::from(1u32)),
        Err(Error::InvalidGroupParameters { .. })
    ));
    assert!(matches!(
        ModPGroup::new(BigUint::from(2040u32), BigUint::from(4u32)),
        Err(Error::InvalidGroupParameters { .. })
    ));
}
