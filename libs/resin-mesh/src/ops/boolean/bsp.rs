//! BSP tree over convex polygons.
//!
//! A node keeps the plane of the first polygon it received and every
//! polygon lying on that plane; the rest goes to the front or back child.
//! All walks use explicit stacks since skirts of detailed scans nest deep.

use super::plane::Plane;
use super::polygon::Polygon;

#[derive(Debug, Clone, Default)]
pub struct BspNode {
    plane: Option<Plane>,
    /// Polygons on `plane`, either facing
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Builds a tree holding `polygons`.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut root = Self::default();
        root.build(polygons);
        root
    }

    /// Adds polygons, splitting those that straddle a node plane.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let mut stack: Vec<(&mut BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let BspNode {
                plane,
                polygons,
                front,
                back,
            } = node;
            let splitter = *plane.get_or_insert(*polys[0].plane());

            let estimated_size = polys.len() / 2 + 1;
            let mut front_polys = Vec::with_capacity(estimated_size);
            let mut back_polys = Vec::with_capacity(estimated_size);
            let mut coplanar_back = Vec::new();

            for poly in polys {
                poly.split(
                    &splitter,
                    polygons,
                    &mut coplanar_back,
                    &mut front_polys,
                    &mut back_polys,
                );
            }
            polygons.append(&mut coplanar_back);

            if !front_polys.is_empty() {
                let child = front.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), front_polys));
            }
            if !back_polys.is_empty() {
                let child = back.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), back_polys));
            }
        }
    }

    /// Swaps inside and outside of the solid.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            for poly in &mut node.polygons {
                poly.flip();
            }
            if let Some(plane) = &mut node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            let BspNode { front, back, .. } = node;
            if let Some(front) = front {
                stack.push(front.as_mut());
            }
            if let Some(back) = back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Returns the parts of `polygons` outside the solid of this tree.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<(&BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::new();
            let mut back_polys = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();

            for poly in polys {
                poly.split(
                    &plane,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front_polys,
                    &mut back_polys,
                );
            }
            front_polys.append(&mut coplanar_front);
            back_polys.append(&mut coplanar_back);

            match &node.front {
                Some(front) => stack.push((front.as_ref(), front_polys)),
                None => result.extend(front_polys),
            }

            // Without a back tree, back polygons are inside the solid
            if let Some(back) = &node.back {
                stack.push((back.as_ref(), back_polys));
            }
        }

        result
    }

    /// Drops the parts of this tree's polygons inside `other`.
    pub fn clip_to(&mut self, other: &BspNode) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(std::mem::take(&mut node.polygons));

            let BspNode { front, back, .. } = node;
            if let Some(front) = front {
                stack.push(front.as_mut());
            }
            if let Some(back) = back {
                stack.push(back.as_mut());
            }
        }
    }

    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());

            if let Some(front) = &node.front {
                stack.push(front.as_ref());
            }
            if let Some(back) = &node.back {
                stack.push(back.as_ref());
            }
        }

        result
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&BspNode, usize)> = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);

            if let Some(front) = &node.front {
                stack.push((front.as_ref(), depth + 1));
            }
            if let Some(back) = &node.back {
                stack.push((back.as_ref(), depth + 1));
            }
        }

        max_depth
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        let mut stack = Vec::new();

        if let Some(front) = self.front.take() {
            stack.push(front);
        }
        if let Some(back) = self.back.take() {
            stack.push(back);
        }

        while let Some(mut node) = stack.pop() {
            // `node` is childless by the time it drops
            if let Some(front) = node.front.take() {
                stack.push(front);
            }
            if let Some(back) = node.back.take() {
                stack.push(back);
            }
        }
    }
}
