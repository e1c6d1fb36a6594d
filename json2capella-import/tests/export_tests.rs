use json2capella_import::definitions::JsonPackage;
use json2capella_import::{
    ImportOptions, ImportSet, Importer, export_package, find_package, list_packages,
};
use json2capella_model::{ConflictPolicy, Model, ModelElement};
use json2capella_types::{ElementId, Layer, ScopePath};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fleet_model() -> Model {
    let mut model = Model::new("test");
    let fleet = ModelElement::package("Fleet");
    model
        .data_package_mut(Layer::La)
        .unwrap()
        .children
        .push(fleet);

    let input = ImportSet::from_json_str(
        &json!({
            "name": "Fleet",
            "structs": [{
                "name": "Vehicle",
                "info": "A road vehicle",
                "attrs": [
                    { "name": "id", "dataType": "uint32" },
                    { "name": "wheels", "dataType": "uint8", "multiplicity": "2..*", "range": "2..18" },
                    { "name": "color", "enumType": "Color" },
                    { "name": "engine", "composition": "Engine" },
                    { "name": "owner", "reference": "Engine" }
                ]
            }, {
                "name": "Engine"
            }],
            "enums": [{
                "name": "Color",
                "enumLiterals": [{ "name": "RED", "intId": 4 }, { "name": "GREEN" }]
            }]
        })
        .to_string(),
        "fleet.json",
    )
    .unwrap();
    Importer::new(ImportOptions::new(Layer::La, ConflictPolicy::Skip).with_root("Fleet"))
        .import(&mut model, &input, None)
        .unwrap();
    model
}

fn fleet_id(model: &Model) -> ElementId {
    let data = model.data_package(Layer::La).unwrap();
    find_package(data, "Fleet").unwrap().1.id
}

#[test]
fn exports_structs_attrs_and_enums() {
    let model = fleet_model();
    let fleet = fleet_id(&model);
    let exported = export_package(&model, "Fleet").unwrap();

    let expected: JsonPackage = serde_json::from_value(json!({
        "name": "Fleet",
        "prefix": fleet.to_string(),
        "structs": [{
            "name": "Vehicle",
            "info": "A road vehicle",
            "attrs": [
                { "name": "id", "dataType": "uint32", "multiplicity": "1" },
                { "name": "wheels", "dataType": "uint8", "multiplicity": "2..*", "range": "2..18" },
                { "name": "color", "enumType": format!("{fleet}.Color"), "multiplicity": "1" },
                { "name": "engine", "composition": format!("{fleet}.Engine"), "multiplicity": "1" },
                { "name": "owner", "reference": format!("{fleet}.Engine"), "multiplicity": "1" }
            ]
        }, {
            "name": "Engine"
        }],
        "enums": [{
            "name": "Color",
            "enumLiterals": [{ "name": "RED", "intId": 4 }, { "name": "GREEN", "intId": 1 }]
        }]
    }))
    .unwrap();
    assert_eq!(exported, expected);
}

#[test]
fn export_by_id_and_ambiguity() {
    let model = fleet_model();
    let by_id = export_package(&model, &fleet_id(&model).to_string()).unwrap();
    assert_eq!(by_id.name, "Fleet");

    // Every layer has a data package called "Data".
    let err = export_package(&model, "Data").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("more than one package named 'Data'"), "{err}");

    let err = export_package(&model, "Nowhere").unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn exporting_a_non_package_id_fails() {
    let model = fleet_model();
    let data = model.data_package(Layer::La).unwrap();
    let path: ScopePath = ["Fleet", "Vehicle"].into_iter().collect();
    let vehicle = data.resolve(&path).unwrap().id;

    let err = export_package(&model, &vehicle.to_string()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn exported_packages_import_again() {
    let model = fleet_model();
    let exported = export_package(&model, "Fleet").unwrap();
    let input = ImportSet::from_packages(vec![("fleet.json".into(), exported)]).unwrap();

    let mut fresh = Model::new("copy");
    Importer::new(ImportOptions::new(Layer::Sa, ConflictPolicy::Abort))
        .import(&mut fresh, &input, None)
        .unwrap();

    let again = export_package(&fresh, "Fleet").unwrap();
    let attrs = |p: &JsonPackage| -> Vec<(String, Option<String>, Option<String>)> {
        p.structs[0]
            .attrs
            .iter()
            .map(|a| (a.name.clone(), a.data_type.clone(), a.multiplicity.clone()))
            .collect()
    };
    let original = export_package(&model, "Fleet").unwrap();
    assert_eq!(attrs(&again), attrs(&original));
    assert_eq!(again.enums, original.enums);
}

#[test]
fn listing_names_every_data_package() {
    let model = fleet_model();
    let packages = list_packages(&model);

    let layers: Vec<Layer> = packages.iter().map(|p| p.layer).collect();
    assert_eq!(
        layers,
        vec![Layer::Oa, Layer::Sa, Layer::La, Layer::La, Layer::La, Layer::Pa]
    );
    let la: Vec<String> = packages
        .iter()
        .filter(|p| p.layer == Layer::La)
        .map(|p| p.path.to_string())
        .collect();
    assert_eq!(la, vec!["/", "/Fleet", "/Data Types"]);
}
