use crate::scm::{
    bone::Bone,
    error::{Region, ValidationError},
    section::SectionTag,
    triangle::{Triangle, MAX_VERTEX_INDEX},
    vertex::Vertex,
    ScmFile,
};

pub(crate) fn validate(mesh: &ScmFile) -> Result<(), ValidationError> {
    check_bones(&mesh.bones)?;
    check_vertices(&mesh.vertices, mesh.bones.len())?;
    check_triangles(&mesh.triangles, mesh.vertices.len())?;
    check_info(&mesh.info)?;
    check_counts(mesh)
}

/// Parents must come before the bone, or be the bone itself.
fn check_bones(bones: &[Bone]) -> Result<(), ValidationError> {
    for (index, bone) in bones.iter().enumerate() {
        let has_valid_parent =
            bone.is_root() || bone.parent().is_some_and(|parent| parent <= index);

        if !has_valid_parent {
            return Err(ValidationError::InvalidParent {
                bone: index,
                parent: bone.parent_index,
            });
        }

        if bone.name.contains('\0') {
            return Err(ValidationError::NulInBoneName { bone: index });
        }
    }

    Ok(())
}

fn check_vertices(vertices: &[Vertex], bone_count: usize) -> Result<(), ValidationError> {
    match vertices
        .iter()
        .position(|vertex| usize::from(vertex.bone()) >= bone_count)
    {
        Some(vertex) => Err(ValidationError::InvalidBoneIndex {
            vertex,
            bone_index: vertices[vertex].bone(),
            bone_count,
        }),
        None => Ok(()),
    }
}

fn check_triangles(triangles: &[Triangle], vertex_count: usize) -> Result<(), ValidationError> {
    let limit = vertex_count.min(usize::from(MAX_VERTEX_INDEX) + 1);

    for (triangle, Triangle { indices }) in triangles.iter().enumerate() {
        if let Some(index) = indices.iter().find(|index| usize::from(**index) >= limit) {
            return Err(ValidationError::InvalidVertexIndex {
                triangle,
                index: *index,
                limit,
            });
        }
    }

    Ok(())
}

fn check_info(info: &[String]) -> Result<(), ValidationError> {
    match info.iter().position(|string| string.contains('\0')) {
        Some(index) => Err(ValidationError::NulInInfo { index }),
        None => Ok(()),
    }
}

fn check_counts(mesh: &ScmFile) -> Result<(), ValidationError> {
    let fits = |count: Option<usize>, tag: SectionTag| {
        count
            .and_then(|count| u32::try_from(count).ok())
            .map(|_| ())
            .ok_or(ValidationError::TooLarge(Region::Section(tag)))
    };

    fits(Some(mesh.bones.len()), SectionTag::Skeleton)?;
    fits(Some(mesh.vertices.len()), SectionTag::Vertices)?;
    fits(mesh.triangles.len().checked_mul(3), SectionTag::Triangles)
}
